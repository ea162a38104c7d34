use bevy::app::AppExit;
use bevy::asset::LoadState;
use bevy::prelude::*;
use bevy::utils::HashMap;
use thiserror::Error;

/// Loads a fixed manifest of named images at startup and polls them
/// until every one is ready. A failed load is fatal: the game cannot
/// draw without its sprites, so the app exits with an error code.
pub struct ArtPlugin {
    manifest: Vec<(&'static str, &'static str)>,
}

impl ArtPlugin {
    #[must_use]
    pub fn new(manifest: &[(&'static str, &'static str)]) -> Self {
        Self {
            manifest: manifest.to_vec(),
        }
    }
}

impl Plugin for ArtPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ArtManifest(self.manifest.clone()))
            .init_resource::<BankValidation>()
            .add_systems(Startup, setup_image_bank)
            .add_systems(Update, validate_image_bank);
    }
}

#[derive(Error, Debug)]
pub enum ArtError {
    #[error("Failed to load image {path:?}: {message}")]
    ImageLoadError { path: String, message: String },

    #[error("No image named {0:?} in the bank")]
    UnknownImage(String),
}

#[derive(Resource)]
struct ArtManifest(Vec<(&'static str, &'static str)>);

/// Shared read-only image handles, keyed by manifest name.
#[derive(Resource, Default)]
pub struct ImageBank {
    images: HashMap<&'static str, (Handle<Image>, &'static str)>,
}

impl ImageBank {
    #[must_use]
    pub fn image(&self, name: &str) -> Option<Handle<Image>> {
        let Some((handle, _)) = self.images.get(name) else {
            error!("{}", ArtError::UnknownImage(name.to_string()));
            return None;
        };
        Some(handle.clone())
    }
}

#[derive(Resource, Default)]
pub struct BankValidation {
    is_loaded: bool,
    total_images: usize,
}

fn setup_image_bank(mut commands: Commands, asset_server: Res<AssetServer>, manifest: Res<ArtManifest>) {
    let images = manifest
        .0
        .iter()
        .map(|&(name, path)| (name, (asset_server.load::<Image>(path), path)))
        .collect();

    commands.insert_resource(ImageBank { images });
}

fn validate_image_bank(
    bank: Res<ImageBank>,
    mut validation: ResMut<BankValidation>,
    asset_server: Res<AssetServer>,
    mut exit: EventWriter<AppExit>,
) {
    if validation.is_loaded {
        return;
    }

    let mut all_loaded = true;
    for (handle, path) in bank.images.values() {
        match asset_server.load_state(handle.id()) {
            LoadState::Loaded => {}
            LoadState::Failed(err) => {
                error!(
                    "{}",
                    ArtError::ImageLoadError {
                        path: (*path).to_string(),
                        message: err.to_string(),
                    }
                );
                exit.send(AppExit::error());
                return;
            }
            _ => all_loaded = false,
        }
    }

    if !all_loaded {
        return;
    }

    validation.is_loaded = true;
    validation.total_images = bank.images.len();
    info!("Image bank ready: {} images", validation.total_images);
}

/// Returns whether every manifest image has finished loading
#[must_use]
pub fn is_bank_ready(validation: &Res<BankValidation>) -> bool {
    validation.is_loaded
}
