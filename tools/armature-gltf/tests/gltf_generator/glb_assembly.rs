//! GLB container assembly.

use serde_json::Value;

const CHUNK_JSON: u32 = 0x4E4F534A;
const CHUNK_BIN: u32 = 0x004E4942;

/// Wrap a glTF JSON document and its binary buffer into a GLB file
pub(crate) fn assemble_glb(root: &Value, buffer_data: &[u8]) -> Vec<u8> {
    let mut root = root.clone();
    root["buffers"][0]["byteLength"] = buffer_data.len().into();

    let json_bytes = serde_json::to_vec(&root).expect("Failed to serialize glTF JSON");

    // Both chunks are 4-byte aligned: JSON padded with spaces, BIN with zeros
    let json_padding = (4 - json_bytes.len() % 4) % 4;
    let json_chunk_length = json_bytes.len() + json_padding;
    let bin_padding = (4 - buffer_data.len() % 4) % 4;
    let bin_chunk_length = buffer_data.len() + bin_padding;

    let total_length = 12 + 8 + json_chunk_length + 8 + bin_chunk_length;
    let mut glb = Vec::with_capacity(total_length);

    glb.extend_from_slice(b"glTF");
    glb.extend_from_slice(&2u32.to_le_bytes());
    glb.extend_from_slice(&(total_length as u32).to_le_bytes());

    glb.extend_from_slice(&(json_chunk_length as u32).to_le_bytes());
    glb.extend_from_slice(&CHUNK_JSON.to_le_bytes());
    glb.extend_from_slice(&json_bytes);
    glb.extend(std::iter::repeat_n(b' ', json_padding));

    glb.extend_from_slice(&(bin_chunk_length as u32).to_le_bytes());
    glb.extend_from_slice(&CHUNK_BIN.to_le_bytes());
    glb.extend_from_slice(buffer_data);
    glb.extend(std::iter::repeat_n(0u8, bin_padding));

    glb
}
