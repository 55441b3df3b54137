use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use controller::{
    events::{event_record, SiteInfo},
    next_mode, Controller,
};
use ports::InputScript;
use shared::{
    domain::{InputSample, Mode},
    protocol::TickReport,
};

#[derive(Parser, Debug)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate one transition without touching any state.
    NextMode {
        #[arg(long)]
        current: Mode,
        /// Raw pin levels in reset, internal error, comm error, fire alert,
        /// gps order, e.g. `11011`. Low (0) is pressed.
        #[arg(long, conflicts_with_all = ["reset", "internal_error", "comm_error", "fire_alert"])]
        levels: Option<String>,
        #[arg(long)]
        reset: bool,
        #[arg(long)]
        internal_error: bool,
        #[arg(long)]
        comm_error: bool,
        #[arg(long)]
        fire_alert: bool,
    },
    /// Run a tick script through a fresh controller and print every frame.
    Replay {
        script: String,
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::NextMode {
            current,
            levels,
            reset,
            internal_error,
            comm_error,
            fire_alert,
        } => {
            let input = match levels {
                Some(levels) => InputSample::parse_levels(&levels)?,
                None => flag_sample(reset, internal_error, comm_error, fire_alert),
            };
            println!("{}", next_mode(current, input));
        }
        Command::Replay { script, json } => {
            let script = InputScript::load(&script).await?;
            let site = SiteInfo::default();
            let mut controller = Controller::new();

            for sample in script.samples() {
                let outcome = controller.tick(sample);
                let event =
                    event_record(&site, outcome.executed, controller.state(), false, 0.0);
                let report = TickReport {
                    tick: controller.ticks(),
                    at: Utc::now(),
                    executed: outcome.executed,
                    next: outcome.next,
                    frame: outcome.frame,
                    event,
                };

                if json {
                    println!("{}", serde_json::to_string(&report)?);
                } else {
                    println!(
                        "tick {} {} -> {} {}",
                        report.tick, report.executed, report.next, report.event
                    );
                    println!("{}", report.frame);
                    println!();
                }
            }
        }
    }

    Ok(())
}

fn flag_sample(reset: bool, internal_error: bool, comm_error: bool, fire_alert: bool) -> InputSample {
    InputSample {
        reset_pressed: reset,
        internal_error_pressed: internal_error,
        comm_error_pressed: comm_error,
        fire_alert_pressed: fire_alert,
        gps_requested: false,
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
