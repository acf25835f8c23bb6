//! Import options shared by the format backends.

/// Tunables for one import call.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Encode media entries as inline data references.
    embed_media: bool,

    /// Skip media entries larger than this many uncompressed bytes.
    max_media_bytes: Option<u64>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            embed_media: true,
            max_media_bytes: None,
        }
    }
}

impl ImportOptions {
    /// Create options with media embedding on and no size limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn inline media encoding on or off.
    pub fn with_embed_media(mut self, embed: bool) -> Self {
        self.embed_media = embed;
        self
    }

    /// Limit the size of media entries that get encoded.
    pub fn with_max_media_bytes(mut self, limit: Option<u64>) -> Self {
        self.max_media_bytes = limit;
        self
    }

    pub fn embed_media(&self) -> bool {
        self.embed_media
    }

    pub fn max_media_bytes(&self) -> Option<u64> {
        self.max_media_bytes
    }

    /// Whether a media entry of `size` bytes should be encoded.
    pub fn accepts_media_size(&self, size: u64) -> bool {
        self.embed_media && self.max_media_bytes.map_or(true, |limit| size <= limit)
    }
}
