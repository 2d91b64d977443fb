use std::time::Duration;

use anyhow::{anyhow, Error};
use log::{info, warn};
use tokio::time::{interval, MissedTickBehavior};

use crate::{controller::LedController, transport::Transport};

pub use self::effect::Effect;

pub mod effect;

/// Render and send frames at `fps` until `frame_limit` frames have been
/// produced, or forever when there is no limit.
///
/// A frame that is late is dropped rather than sent in a burst after the
/// next one. Returns the number of frames produced.
pub async fn run<T: Transport>(
    controller: &mut LedController<T>,
    effect: &mut Effect,
    fps: u32,
    frame_limit: Option<u64>,
) -> Result<u64, Error> {
    if fps == 0 {
        return Err(anyhow!("frame rate must be at least 1 fps"));
    }

    let mut ticker = interval(Duration::from_secs(1) / fps);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        "Render: {} LEDs at {} fps, {} packets per frame",
        controller.strip().len(),
        fps,
        controller.total_packets()
    );

    let mut frames = 0;
    while frame_limit.map_or(true, |limit| frames < limit) {
        ticker.tick().await;

        effect.render(controller.strip_mut());
        match controller.upload() {
            Ok(stats) if stats.failed > 0 => {
                warn!(
                    "Render: frame {} lost {} of {} packets",
                    frames,
                    stats.failed,
                    stats.sent + stats.failed
                );
            }
            Ok(_) => {}
            Err(e) => warn!("Render: frame {} not sent: {}", frames, e),
        }

        frames += 1;
    }

    Ok(frames)
}
