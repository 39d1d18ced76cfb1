//! Animation clips bound to a model's scene graph

use crate::bones::BoneRegistry;
use crate::import::{ImportedAnimation, ImportedChannel};
use crate::options::ModelOptions;
use crate::scene::SceneGraph;

use super::interpolation::is_sorted;
use super::lookup::NodeLookup;
use super::types::{AnimationChannel, Keyframe, QuatKey, normalize_rotation};

/// A keyframe animation ready for pose evaluation
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    /// Length in ticks
    duration: f64,
    /// Playback rate, already defaulted when the source had none
    ticks_per_second: f64,
    channels: Vec<AnimationChannel>,
    lookup: NodeLookup,
}

impl AnimationClip {
    /// Build a clip and its node lookup against `scene`
    ///
    /// The scene may belong to a different model than the one the animation
    /// was authored for; channels are matched by node name. All bones must
    /// already be registered.
    pub fn from_imported(
        animation: &ImportedAnimation,
        scene: &SceneGraph,
        bones: &BoneRegistry,
        options: &ModelOptions,
        owner: &str,
    ) -> Self {
        let ticks_per_second = if animation.ticks_per_second > 0.0 {
            animation.ticks_per_second
        } else {
            options.default_ticks_per_second
        };

        let channels: Vec<AnimationChannel> = animation
            .channels
            .iter()
            .map(|channel| Self::convert_channel(channel, options, owner))
            .collect();

        let lookup = NodeLookup::build(&channels, scene, bones, owner);
        log::debug!(
            "{}: animation '{}' has {} channels driving {} of {} nodes",
            owner,
            animation.name,
            channels.len(),
            lookup.animated_count(),
            lookup.len()
        );

        Self {
            name: animation.name.clone(),
            duration: animation.duration,
            ticks_per_second,
            channels,
            lookup,
        }
    }

    fn convert_channel(
        channel: &ImportedChannel,
        options: &ModelOptions,
        owner: &str,
    ) -> AnimationChannel {
        let name = &channel.node_name;
        let rotation_keys: Vec<QuatKey> = channel
            .rotation_keys
            .iter()
            .map(|key| Keyframe::new(key.time, normalize_rotation(key.value)))
            .collect();

        let mut converted = AnimationChannel {
            node_name: name.clone(),
            position_keys: channel.position_keys.clone(),
            rotation_keys,
            scaling_keys: channel.scaling_keys.clone(),
        };

        Self::check_track(&mut converted.position_keys, "position", name, options, owner);
        Self::check_track(&mut converted.rotation_keys, "rotation", name, options, owner);
        Self::check_track(&mut converted.scaling_keys, "scaling", name, options, owner);

        converted
    }

    fn check_track<T>(
        keys: &mut [Keyframe<T>],
        track: &str,
        node_name: &str,
        options: &ModelOptions,
        owner: &str,
    ) {
        if keys.is_empty() {
            log::warn!(
                "{}: channel '{}' has no {} keys, using the neutral value",
                owner,
                node_name,
                track
            );
            return;
        }

        if !is_sorted(keys) {
            if options.sort_unordered_keys {
                log::warn!(
                    "{}: channel '{}' has unordered {} keys, sorting them",
                    owner,
                    node_name,
                    track
                );
                keys.sort_by(|a, b| a.time.total_cmp(&b.time));
            } else {
                log::warn!(
                    "{}: channel '{}' has unordered {} keys",
                    owner,
                    node_name,
                    track
                );
            }
        }
    }

    /// Length in ticks
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn ticks_per_second(&self) -> f64 {
        self.ticks_per_second
    }

    /// Convert a time in seconds into looped clip ticks
    ///
    /// The result lies in `[0, duration)`. Negative times wrap backwards from
    /// the end of the clip. Clips without a positive duration are not wrapped.
    pub fn local_time(&self, seconds: f64) -> f64 {
        let ticks = seconds * self.ticks_per_second;
        if self.duration <= 0.0 {
            return ticks;
        }

        // rem_euclid rounds tiny negative inputs up to exactly `duration`
        let wrapped = ticks.rem_euclid(self.duration);
        if wrapped >= self.duration { 0.0 } else { wrapped }
    }

    pub fn channels(&self) -> &[AnimationChannel] {
        &self.channels
    }

    pub fn channel(&self, index: usize) -> Option<&AnimationChannel> {
        self.channels.get(index)
    }

    pub fn lookup(&self) -> &NodeLookup {
        &self.lookup
    }
}
