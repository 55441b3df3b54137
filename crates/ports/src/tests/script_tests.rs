use super::*;

const SCRIPT: &str = r#"
[[tick]]

[[tick]]
fire_alert = 0

[[tick]]
reset = 0
gps = 0
"#;

#[test]
fn omitted_pins_default_to_released() {
    let script = InputScript::parse(SCRIPT).expect("parse");
    let samples = script.samples();
    assert_eq!(samples.len(), 3);
    assert_eq!(samples[0], InputSample::default());
    assert!(samples[1].fire_alert_pressed);
    assert!(!samples[1].reset_pressed);
    assert!(samples[2].reset_pressed && samples[2].gps_requested);
}

#[test]
fn empty_script_is_rejected() {
    assert!(matches!(
        InputScript::parse(""),
        Err(PortError::EmptyScript)
    ));
    assert!(matches!(
        InputScript::parse("[[tick]]\nreset = \"low\""),
        Err(PortError::Script(_))
    ));
}

#[tokio::test]
async fn scripted_inputs_cycle() {
    let inputs = ScriptedInputs::new(&InputScript::parse(SCRIPT).expect("parse"));
    assert_eq!(inputs.len(), 3);

    let mut fire_ticks = Vec::new();
    for tick in 0..6 {
        if inputs.sample().await.expect("sample").fire_alert_pressed {
            fire_ticks.push(tick);
        }
    }
    assert_eq!(fire_ticks, vec![1, 4]);
}

#[tokio::test]
async fn load_reports_missing_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("absent.toml");
    let error = InputScript::load(&missing).await.expect_err("missing");
    assert!(matches!(error, PortError::Io { .. }));
    assert!(error.to_string().contains("absent.toml"));
}
