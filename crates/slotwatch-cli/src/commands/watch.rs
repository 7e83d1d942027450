use anyhow::Result;
use slotwatch_application::{AppContext, ControllerEvent};
use slotwatch_core::ScanKind;
use slotwatch_infrastructure::SlotwatchPaths;
use tokio::sync::mpsc;

use super::SearchArgs;

/// Runs a baseline search, then alerts on new dates until Ctrl-C.
pub async fn run(paths: SlotwatchPaths, search: SearchArgs) -> Result<()> {
    let context = AppContext::load(paths).await?;
    let (query, month) = search.resolve(&context.default_query())?;
    let (tx, mut events) = mpsc::unbounded_channel();
    let controller = context.controller(query, month, Some(tx));

    controller.start_one_shot().await;
    let baseline = controller.snapshot().await;
    println!("{}", baseline.status_text);
    for date in &baseline.available_dates {
        println!("  {date}");
    }

    controller.enable_alerting().await?;
    println!(
        "Watching every {}s. Press Ctrl-C to stop.",
        context.settings().interval.as_secs()
    );

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(ControllerEvent::NewDatesFound { dates }) => {
                    println!("🎉 New appointment found!");
                    for date in dates {
                        println!("  {date}");
                    }
                }
                Some(ControllerEvent::ScanFinished { kind: ScanKind::Alert, .. }) => {
                    tracing::debug!("Alert scan finished");
                }
                Some(_) => {}
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                println!("Stopping.");
                break;
            }
        }
    }

    controller.shutdown().await;
    Ok(())
}
