use hangar_render::MeshId;
use std::path::{Path, PathBuf};

/// Model files, relative to the resource root.
const TERRAIN_OBJ: &str = "objects/grass/grass.obj";
const FREIGHTER_OBJ: &str = "objects/freighter/freighter.obj";
const TREES_OBJ: &str = "objects/trees/trees9.obj";
const STATION_OBJ: &str = "objects/space_station/Space Station Scene.obj";

/// Cubemap faces in +X, -X, +Y, -Y, +Z, -Z layer order.
const SKYBOX_FACES: [&str; 6] = [
    "textures/right.png",
    "textures/left.png",
    "textures/top.png",
    "textures/bottom.png",
    "textures/front.png",
    "textures/back.png",
];

/// Errors that prevent the scene from being built. Missing textures are not
/// errors; they degrade to fallback texels.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to load model {path}: {source}")]
    Model {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },
    #[error("model {path} contains no triangles")]
    EmptyModel { path: PathBuf },
}

/// Where the scene's models and textures live on disk.
#[derive(Debug, Clone)]
pub struct SceneAssets {
    root: PathBuf,
}

impl SceneAssets {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// OBJ file for a mesh. The skybox is built-in geometry and has none.
    pub fn model(&self, mesh: MeshId) -> Option<PathBuf> {
        let relative = match mesh {
            MeshId::Terrain => TERRAIN_OBJ,
            MeshId::Freighter => FREIGHTER_OBJ,
            MeshId::Trees => TREES_OBJ,
            MeshId::Station => STATION_OBJ,
            MeshId::Skybox => return None,
        };
        Some(self.root.join(relative))
    }

    pub fn skybox_faces(&self) -> [PathBuf; 6] {
        SKYBOX_FACES.map(|face| self.root.join(face))
    }
}
