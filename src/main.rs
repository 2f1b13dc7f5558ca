use std::sync::Arc;

use rumblelink::{
    analysis::FileAnalysisSource,
    common::{
        banner::{BannerInfo, print_banner},
        logger,
        types::{AnyResult, TrackId},
    },
    configs::Config,
    device::{DeviceManager, LogActuator},
    engine::HapticEngine,
    playback::LocalClock,
};
use tracing::info;

#[tokio::main]
async fn main() -> AnyResult<()> {
    let config = Config::load()?;
    logger::init(&config.logging);
    print_banner(&BannerInfo::default());

    let devices = Arc::new(DeviceManager::new(config.devices.clone()));
    for name in &config.devices.dry_run {
        let device = LogActuator::new(devices.allocate_id(), name.clone());
        devices.add(Arc::new(device)).await;
    }

    let mut run_test = false;
    let mut track = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--test" => run_test = true,
            _ => track = Some(TrackId::from(arg)),
        }
    }

    if run_test {
        info!("Playing test vibration on {} device(s)", devices.len());
        devices.test_all().await;
    }

    let analysis = Arc::new(FileAnalysisSource::new(&config.analysis.directory));
    let (clock, events) = LocalClock::new();
    let clock = Arc::new(clock);

    let engine = Arc::new(HapticEngine::new(
        config.haptics.clone(),
        devices.clone(),
        analysis,
        clock.clone(),
    ));
    let mut engine_task = tokio::spawn(engine.run(events));

    match track {
        Some(track) => clock.play(track),
        None => info!("No track given; pass a track id to start playback"),
    }

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("Shutdown signal received");
        }
        _ = &mut engine_task => {}
    }

    clock.stop();
    devices.stop_all().await;
    engine_task.abort();
    Ok(())
}
