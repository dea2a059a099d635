//! Response compression.

use tower_http::compression::CompressionLayer;

/// Gzip for clients that accept it.
pub fn build_compression_layer() -> CompressionLayer {
    CompressionLayer::new()
}
