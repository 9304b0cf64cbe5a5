use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::animation::clip::{AnimationClip, ClipRef, EffectScope, LoopMode};
use crate::animation::controller::AnimationController;
use crate::assets::source::ClipSource;
use crate::errors::{Result, StriderError};

/// One clip a character needs, as listed in its manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationInput {
    pub url: String,
    pub name: String,
    pub scope: EffectScope,
    #[serde(default)]
    pub loop_mode: LoopMode,
    #[serde(default = "default_weight")]
    pub weight: f32,
}

fn default_weight() -> f32 {
    1.0
}

impl AnimationInput {
    pub fn new(
        url: impl Into<String>,
        name: impl Into<String>,
        scope: EffectScope,
        loop_mode: LoopMode,
        weight: f32,
    ) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
            scope,
            loop_mode,
            weight,
        }
    }
}

/// Model location plus the clips to load for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterManifest {
    pub model_url: String,
    pub clips: Vec<AnimationInput>,
}

impl CharacterManifest {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Loads every clip of `inputs` and registers them in manifest order.
///
/// All-or-nothing: on any failure (duplicate name, bad weight, asset error)
/// nothing is registered. Clips are fetched concurrently.
pub async fn load_character_clips<S: ClipSource>(
    source: &S,
    inputs: &[AnimationInput],
    controller: &mut AnimationController,
) -> Result<Vec<ClipRef>> {
    let mut seen = FxHashSet::default();
    for input in inputs {
        if !seen.insert(input.name.as_str()) || controller.registry().contains(&input.name) {
            return Err(StriderError::DuplicateClipName(input.name.clone()));
        }
        if input.weight.is_nan() || input.weight <= 0.0 {
            return Err(StriderError::InvalidConfig(format!(
                "clip '{}' has non-positive weight {}",
                input.name, input.weight
            )));
        }
    }

    let loads = inputs
        .iter()
        .map(|input| source.load_skeletal_clip(&input.url));
    let data = futures::future::try_join_all(loads).await?;

    let mut registered = Vec::with_capacity(inputs.len());
    for (input, data) in inputs.iter().zip(data) {
        let clip = AnimationClip::new(
            input.name.clone(),
            input.scope,
            input.loop_mode,
            input.weight,
            data,
        );
        registered.push(controller.register(clip)?);
    }

    log::info!("Loaded {} animation clips", registered.len());
    Ok(registered)
}
