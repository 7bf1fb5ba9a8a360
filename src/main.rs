use std::{io, process, sync::mpsc, thread};

use log::{error, info};
use signal_hook::{
    consts::signal::{SIGHUP, SIGINT, SIGQUIT, SIGTERM},
    iterator::Signals,
};

use pi_fan::{config::Config, controller::Controller, fan::Fan, temp::Temp};

const SHUTDOWN_SIGNALS: [i32; 4] = [SIGHUP, SIGINT, SIGTERM, SIGQUIT];

const fn signal_name(signal: i32) -> &'static str {
    match signal {
        SIGHUP => "SIGHUP",
        SIGINT => "SIGINT",
        SIGTERM => "SIGTERM",
        SIGQUIT => "SIGQUIT",
        _ => "unknown",
    }
}

/// Parks a thread on signal delivery; the first termination signal is
/// reported back over the channel and the thread ends.
fn spawn_signal_watcher(shutdown: mpsc::Sender<()>) -> Result<(), io::Error> {
    let mut signals = Signals::new(SHUTDOWN_SIGNALS)?;

    thread::spawn(move || {
        if let Some(signal) = signals.forever().next() {
            info!("Caught signal: {}", signal_name(signal));
            let _ = shutdown.send(());
        }
    });

    Ok(())
}

fn main() {
    let config = Config::new();

    let fan = match Fan::open(config.gpio) {
        Ok(fan) => fan,
        Err(err) => {
            error!("Can't open GPIO pin {}: {err}", config.gpio);
            process::exit(1);
        }
    };

    let (shutdown_tx, shutdown_rx) = mpsc::channel();
    if let Err(err) = spawn_signal_watcher(shutdown_tx) {
        error!("Can't register signal handlers: {err}");
        process::exit(1);
    }

    info!(
        "Fan monitor running: start {}°C, stop {}°C, polling {} every {}s",
        config.start,
        config.stop,
        config.thermal.display(),
        config.sleep_time
    );

    let temp = Temp::new(config.thermal.clone());
    let mut controller = Controller::new(config, temp, fan);

    if let Err(err) = controller.run(&shutdown_rx) {
        error!("Can't read temperature: {err}");
        process::exit(1);
    }

    controller.shutdown();
}
