use std::fs;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use fieldgen::{SceneKind, SceneParams};
use renderer::{FadeCurve, PainterBackend, Renderer, RendererConfig};
use sceneconfig::{BackendSetting, FadeCurveSetting, SceneConfig};
use tracing_subscriber::EnvFilter;

use crate::cli::RunArgs;
use crate::paths::AppPaths;
use crate::state::AppState;

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

pub fn run(args: RunArgs) -> Result<()> {
    let paths = AppPaths::discover()?;
    let config = load_config(&args, &paths)?;

    let scene_kind = match &args.scene {
        Some(id) => SceneKind::from_id(id).ok_or_else(|| {
            anyhow!(
                "unknown scene '{id}' (expected one of: {})",
                SceneKind::all()
                    .iter()
                    .map(|kind| kind.id())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })?,
        None => config.scene_kind()?,
    };

    let backend = args
        .backend
        .or_else(|| config.backend.map(map_backend))
        .unwrap_or_else(|| PainterBackend::default_for(scene_kind));
    if !backend.supports(scene_kind) {
        anyhow::bail!(
            "scene '{}' renders on the cpu backend only",
            scene_kind.id()
        );
    }

    let scene = SceneParams {
        kind: scene_kind,
        palette: config.resolved_palette()?,
        fbm: config.fbm_params(),
        ripple: config.ripple_params(),
        frequency: config.noise.frequency,
        drift_rate: config.noise.drift,
        intensity: config.plasma.intensity,
        seed: args.seed.or(config.seed).unwrap_or(0),
    };

    let state_file = paths.state_file();
    let mut app_state = AppState::load_or_default(&state_file)?;
    let intro_played = app_state.intro_played && !args.replay_intro;

    let renderer_config = RendererConfig {
        window_size: args.size.unwrap_or((1280, 720)),
        scene,
        backend,
        target_fps: normalize_fps(args.fps.or(config.fps)),
        fade_duration: Duration::from_secs_f32(config.fade.duration.max(0.0)),
        fade_curve: map_fade_curve(config.fade.curve),
        intro_played,
    };

    tracing::info!(
        scene = scene_kind.id(),
        %backend,
        fps = ?renderer_config.target_fps,
        "starting backdrop"
    );
    Renderer::new(renderer_config).run()?;

    if !app_state.intro_played {
        app_state.intro_played = true;
        app_state.persist(&state_file)?;
    }
    Ok(())
}

fn load_config(args: &RunArgs, paths: &AppPaths) -> Result<SceneConfig> {
    let path = args.config.clone().or_else(|| {
        let default = paths.default_config_file();
        default.exists().then_some(default)
    });
    match path {
        Some(path) => {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("failed to read configuration at {}", path.display()))?;
            SceneConfig::from_toml_str(&text)
                .with_context(|| format!("invalid configuration at {}", path.display()))
        }
        None => Ok(SceneConfig::default()),
    }
}

fn normalize_fps(value: Option<f32>) -> Option<f32> {
    value.and_then(|fps| if fps > 0.0 { Some(fps) } else { None })
}

fn map_backend(setting: BackendSetting) -> PainterBackend {
    match setting {
        BackendSetting::Cpu => PainterBackend::Cpu,
        BackendSetting::Gpu => PainterBackend::Gpu,
    }
}

fn map_fade_curve(setting: FadeCurveSetting) -> FadeCurve {
    match setting {
        FadeCurveSetting::Linear => FadeCurve::Linear,
        FadeCurveSetting::Smoothstep => FadeCurve::Smoothstep,
        FadeCurveSetting::EaseInOut => FadeCurve::EaseInOut,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_fps_is_treated_as_uncapped() {
        assert_eq!(normalize_fps(Some(0.0)), None);
        assert_eq!(normalize_fps(Some(-5.0)), None);
        assert_eq!(normalize_fps(Some(48.0)), Some(48.0));
        assert_eq!(normalize_fps(None), None);
    }

    #[test]
    fn backend_settings_map_one_to_one() {
        assert_eq!(map_backend(BackendSetting::Cpu), PainterBackend::Cpu);
        assert_eq!(map_backend(BackendSetting::Gpu), PainterBackend::Gpu);
    }
}
