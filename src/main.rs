use clap::Parser;

use midiplay_lib::config::Config;

#[tokio::main]
async fn main() {
    let config = Config::parse();

    midiplay_lib::logging::init_logging(&config.log_level, config.log_file.as_deref());

    if config.list_devices {
        if let Err(e) = midiplay_lib::print_devices() {
            log::error!("{}", e);
            std::process::exit(1);
        }
        return;
    }

    log::info!("midiplay starting");

    if let Err(e) = midiplay_lib::run(config).await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
