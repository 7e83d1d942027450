use anyhow::Result;
use slotwatch_application::AppContext;
use slotwatch_infrastructure::SlotwatchPaths;

use super::SearchArgs;

/// One-shot search: prints the status line and the dates, or JSON.
pub async fn run(paths: SlotwatchPaths, search: SearchArgs, json: bool) -> Result<()> {
    let context = AppContext::load(paths).await?;
    let (query, month) = search.resolve(&context.default_query())?;
    let controller = context.controller(query, month, None);

    controller.start_one_shot().await;
    let snapshot = controller.snapshot().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!(
        "{} · {} · {} {}",
        snapshot.query.consulate,
        snapshot.query.visa_type,
        snapshot.month.name(),
        snapshot.month.year()
    );
    println!("{}", snapshot.status_text);
    for date in &snapshot.available_dates {
        println!("  {date}");
    }
    Ok(())
}
