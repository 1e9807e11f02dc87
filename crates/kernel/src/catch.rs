use broomchase_common::Pose;

use crate::config::CatchConfig;
use crate::wander::WanderAi;

/// Test broom/snitch proximity. On a catch the snitch drops its destination
/// and rests for the catch cooldown. Returns the separation when caught.
///
/// No score is kept here; callers that want one count the returned catches.
pub fn detect(broom: &Pose, snitch: &Pose, ai: &mut WanderAi, config: &CatchConfig) -> Option<f32> {
    let distance = broom.distance_to(snitch);
    if distance > config.distance {
        return None;
    }
    ai.rest(config.cooldown);
    tracing::info!(distance, cooldown = config.cooldown, "snitch caught");
    Some(distance)
}
