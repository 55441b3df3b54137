use super::*;

#[tokio::test]
async fn reads_offset_and_clamps_to_field_of_view() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("hotspot_deg");
    let sensor = FileThermalSensor::new(&path);

    std::fs::write(&path, "-23.5\n").expect("write");
    assert_eq!(sensor.hotspot_offset_deg().await.expect("read"), Some(-23.5));

    std::fs::write(&path, "40").expect("write");
    assert_eq!(sensor.hotspot_offset_deg().await.expect("read"), Some(23.5));
}

#[tokio::test]
async fn missing_or_garbage_means_no_offset() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("hotspot_deg");
    let sensor = FileThermalSensor::new(&path);
    assert_eq!(sensor.hotspot_offset_deg().await.expect("read"), None);

    std::fs::write(&path, "inf").expect("write");
    assert_eq!(sensor.hotspot_offset_deg().await.expect("read"), None);

    std::fs::write(&path, "hot").expect("write");
    assert_eq!(sensor.hotspot_offset_deg().await.expect("read"), None);

    assert_eq!(NoThermalSensor.hotspot_offset_deg().await.expect("read"), None);
}
