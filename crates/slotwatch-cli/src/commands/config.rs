use anyhow::Result;
use slotwatch_application::init_config_files;
use slotwatch_infrastructure::SlotwatchPaths;

pub fn init(paths: &SlotwatchPaths) -> Result<()> {
    let report = init_config_files(paths)?;

    let state = |created: bool| if created { "created" } else { "exists " };
    println!("{} {}", state(report.config_created), report.config_file.display());
    println!("{} {}", state(report.secret_created), report.secret_file.display());
    if report.secret_created {
        println!("Add your Gemini API key to secret.json or set GEMINI_API_KEY.");
    }
    Ok(())
}

pub fn path(paths: &SlotwatchPaths) -> Result<()> {
    println!("config: {}", paths.config_file()?.display());
    println!("secret: {}", paths.secret_file()?.display());
    println!("logs:   {}", paths.logs_dir()?.display());
    Ok(())
}
