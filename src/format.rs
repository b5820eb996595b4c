//! Media type descriptors and well-known identifiers.
//!
//! A [`MediaType`] describes the contents of the buffers flowing over a
//! connection: a kind triplet (major type, subtype, format type), sample
//! sizing, and an opaque format payload.
//!
//! # Wildcards
//!
//! Each member of the triplet is a [`TypeTag`]. [`TypeTag::Any`] is only
//! meaningful in a connection *request*; a committed type always carries
//! concrete identifiers. Matching pattern-matches on the tag, so no real
//! identifier can collide with the wildcard.
//!
//! ```rust
//! use parallax_wrapper::format::{MediaType, TypeTag, kinds, subtypes};
//!
//! let request = MediaType::any().with_major(kinds::AUDIO);
//! let pcm = MediaType::new(kinds::AUDIO, subtypes::PCM, TypeTag::Any);
//! assert!(request.has_wildcards());
//! assert!(pcm.matches_pattern(&request));
//! ```

use bytes::Bytes;
use uuid::Uuid;

// ============================================================================
// TypeTag
// ============================================================================

/// One member of a media type's kind triplet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum TypeTag {
    /// Matches any identifier. Valid in requests only.
    #[default]
    Any,
    /// A concrete identifier.
    Id(Uuid),
}

impl TypeTag {
    /// Whether this is the wildcard.
    #[inline]
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// The concrete identifier, if any.
    #[inline]
    pub fn id(&self) -> Option<Uuid> {
        match self {
            Self::Id(id) => Some(*id),
            Self::Any => None,
        }
    }

    /// Whether `self` satisfies `pattern` (a wildcard pattern matches anything).
    #[inline]
    pub fn matches(&self, pattern: &TypeTag) -> bool {
        match pattern {
            Self::Any => true,
            Self::Id(id) => self.id() == Some(*id),
        }
    }
}

impl From<Uuid> for TypeTag {
    fn from(id: Uuid) -> Self {
        Self::Id(id)
    }
}

// ============================================================================
// MediaType
// ============================================================================

/// Negotiated descriptor of buffer contents.
///
/// Equality is structural, including byte equality of the format payload.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct MediaType {
    /// Major kind (audio, video, stream...).
    pub major: TypeTag,
    /// Sub kind (PCM, RGB32...).
    pub subtype: TypeTag,
    /// Whether every sample has the same size.
    pub fixed_size_samples: bool,
    /// Whether samples depend on each other.
    pub temporal_compression: bool,
    /// Size of one sample in bytes when fixed.
    pub sample_size: u32,
    /// Kind of the format payload.
    pub format_type: TypeTag,
    /// Opaque format payload.
    pub format: Bytes,
}

impl MediaType {
    /// Create a media type from its kind triplet.
    pub fn new(
        major: impl Into<TypeTag>,
        subtype: impl Into<TypeTag>,
        format_type: impl Into<TypeTag>,
    ) -> Self {
        Self {
            major: major.into(),
            subtype: subtype.into(),
            format_type: format_type.into(),
            ..Self::default()
        }
    }

    /// A fully wildcarded request.
    pub fn any() -> Self {
        Self::default()
    }

    /// Set the major kind.
    pub fn with_major(mut self, major: impl Into<TypeTag>) -> Self {
        self.major = major.into();
        self
    }

    /// Set the sub kind.
    pub fn with_subtype(mut self, subtype: impl Into<TypeTag>) -> Self {
        self.subtype = subtype.into();
        self
    }

    /// Set the format kind.
    pub fn with_format_type(mut self, format_type: impl Into<TypeTag>) -> Self {
        self.format_type = format_type.into();
        self
    }

    /// Set a fixed sample size.
    pub fn with_sample_size(mut self, size: u32) -> Self {
        self.fixed_size_samples = size != 0;
        self.sample_size = size;
        self
    }

    /// Set the temporal compression flag.
    pub fn with_temporal_compression(mut self, compressed: bool) -> Self {
        self.temporal_compression = compressed;
        self
    }

    /// Set the format payload.
    pub fn with_format(mut self, format: impl Into<Bytes>) -> Self {
        self.format = format.into();
        self
    }

    /// Whether any member of the triplet is a wildcard.
    pub fn has_wildcards(&self) -> bool {
        self.major.is_any() || self.subtype.is_any() || self.format_type.is_any()
    }

    /// Whether every member of the triplet is a wildcard.
    pub fn is_fully_wildcarded(&self) -> bool {
        self.major.is_any() && self.subtype.is_any() && self.format_type.is_any()
    }

    /// Whether this type agrees with every non-wildcard member of `pattern`.
    pub fn matches_pattern(&self, pattern: &MediaType) -> bool {
        self.major.matches(&pattern.major)
            && self.subtype.matches(&pattern.subtype)
            && self.format_type.matches(&pattern.format_type)
    }

    /// Whether both types share the triplet and the format payload.
    ///
    /// Sample sizing is not compared.
    pub fn same_kind(&self, other: &MediaType) -> bool {
        self.major == other.major
            && self.subtype == other.subtype
            && self.format_type == other.format_type
            && self.format == other.format
    }
}

// ============================================================================
// Well-known identifiers
// ============================================================================

/// Major kinds.
pub mod kinds {
    use uuid::Uuid;

    /// Audio.
    pub const AUDIO: Uuid = Uuid::from_u128(0x73647561_0000_0010_8000_00aa00389b71);
    /// Video.
    pub const VIDEO: Uuid = Uuid::from_u128(0x73646976_0000_0010_8000_00aa00389b71);
    /// Byte stream.
    pub const STREAM: Uuid = Uuid::from_u128(0xe436eb83_524f_11ce_9f53_0020af0ba770);
}

/// Sub kinds.
pub mod subtypes {
    use uuid::Uuid;

    /// Linear PCM audio.
    pub const PCM: Uuid = Uuid::from_u128(0x00000001_0000_0010_8000_00aa00389b71);
    /// 32-bit RGB video.
    pub const RGB32: Uuid = Uuid::from_u128(0xe436eb7e_524f_11ce_9f53_0020af0ba770);
    /// AVI container stream.
    pub const AVI: Uuid = Uuid::from_u128(0xe436eb88_524f_11ce_9f53_0020af0ba770);
}

/// Format payload kinds.
pub mod formats {
    use uuid::Uuid;

    /// No payload.
    pub const NONE: Uuid = Uuid::from_u128(0x0f6417d6_c318_11d0_a43f_00a0c9223196);
    /// Wave format header.
    pub const WAVE_FORMAT_EX: Uuid = Uuid::from_u128(0x05589f81_c356_11ce_bf01_00aa0055595a);
}

/// Component categories used by the registry.
pub mod categories {
    use uuid::Uuid;

    /// Audio decoders.
    pub const AUDIO_DECODER: Uuid = Uuid::from_u128(0x57f2db8b_e6bb_4513_9d43_dcd2a6593125);
    /// Audio effects.
    pub const AUDIO_EFFECT: Uuid = Uuid::from_u128(0xf3602b3f_0592_48df_a4cd_674721e7ebeb);
    /// Video decoders.
    pub const VIDEO_DECODER: Uuid = Uuid::from_u128(0x4a69b442_28be_4991_969c_b500adf5d8a8);
}

/// Class id of the wrapper filter itself.
pub const WRAPPER_CLASS_ID: Uuid = Uuid::from_u128(0x94297043_bd82_4dfd_b0de_8177739c6d20);
