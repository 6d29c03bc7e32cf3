/**
 * This module contains all logic for loading meshes, scenes and atlases from external files
 * and for handing meshes over to the GPU.
 *
 * Asset names are relative to `./assets/` on native targets and to the page origin on the web.
 */
pub mod mesh;
pub mod obj;

use crate::{
    data_structures::mesh::Mesh,
    persistence::{atlas::AtlasFile, scene::Scene},
};

#[cfg(target_arch = "wasm32")]
fn format_url(file_name: &str) -> anyhow::Result<reqwest::Url> {
    let window = web_sys::window().ok_or_else(|| anyhow::anyhow!("no window available"))?;
    let origin = window
        .location()
        .origin()
        .map_err(|e| anyhow::anyhow!("page has no origin: {e:?}"))?;
    let base = reqwest::Url::parse(&format!("{}/assets/", origin))?;
    Ok(base.join(file_name)?)
}

#[cfg(not(target_arch = "wasm32"))]
fn asset_path(file_name: &str) -> std::path::PathBuf {
    std::path::Path::new("./").join("assets").join(file_name)
}

pub async fn load_string(file_name: &str) -> anyhow::Result<String> {
    #[cfg(target_arch = "wasm32")]
    let txt = {
        let url = format_url(file_name)?;
        reqwest::get(url).await?.text().await?
    };
    #[cfg(not(target_arch = "wasm32"))]
    let txt = std::fs::read_to_string(asset_path(file_name))?;

    Ok(txt)
}

pub async fn load_binary(file_name: &str) -> anyhow::Result<Vec<u8>> {
    #[cfg(target_arch = "wasm32")]
    let data = {
        let url = format_url(file_name)?;
        reqwest::get(url).await?.bytes().await?.to_vec()
    };
    #[cfg(not(target_arch = "wasm32"))]
    let data = std::fs::read(asset_path(file_name))?;

    Ok(data)
}

/// Loads and parses an OBJ asset.
pub async fn load_mesh_obj(file_name: &str) -> anyhow::Result<Mesh> {
    let source = load_string(file_name).await?;
    let mesh = Mesh::from_obj(&source)?;
    if mesh.is_empty() {
        log::warn!("Mesh file {} contains no triangles", file_name);
    }
    Ok(mesh)
}

/// Loads an OBJ asset and uploads it right away.
pub async fn load_mesh_buffers(
    file_name: &str,
    device: &wgpu::Device,
) -> anyhow::Result<mesh::MeshBuffers> {
    let mesh = load_mesh_obj(file_name).await?;
    Ok(mesh::upload_mesh(device, &mesh, file_name))
}

/// Loads a `.glges` asset. The scene is named after the file without its extension.
pub async fn load_scene(file_name: &str) -> anyhow::Result<Scene> {
    let bytes = load_binary(file_name).await?;
    let name = file_name.strip_suffix(".glges").unwrap_or(file_name);
    Ok(Scene::from_bytes(name, &bytes)?)
}

pub async fn load_atlas(file_name: &str) -> anyhow::Result<AtlasFile> {
    let bytes = load_binary(file_name).await?;
    Ok(AtlasFile::from_bytes(&bytes)?)
}
