// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! NEO-SD generation Builder objects and functions

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::image::{sprite_images, validate_sprite_planes};
use crate::meta::{DEFAULT_COMPANY, DEFAULT_NAME, Genre, Metadata, RomSizes, parse_ngh};
use crate::rom::{RomBuckets, RomRole, classify};
use crate::{CONFIG_VERSION, Error, Result};

/// Main Builder object
///
/// Model is to create the builder, either from [`Metadata`] or from a JSON
/// config, call `add_file` for each ROM file once loaded, then call `build`
/// to generate the header and the packed payload.
///
/// Nothing is written anywhere by the builder.  The returned [`Package`]
/// holds the complete output, so a failed build never leaves a partial file
/// behind.
///
/// # Example
/// ```
/// use neosd_gen::builder::{Builder, FileData};
/// use neosd_gen::meta::{Genre, Metadata};
///
/// let metadata = Metadata::new(0x0201, "Metal Slug", "Nazca", Genre::Shooter, 1996)?;
/// let mut builder = Builder::new(metadata);
///
/// for (path, data) in [
///     ("201-p1.p1", vec![0u8; 16]),
///     ("201-c1.c1", vec![1u8; 8]),
///     ("201-c2.c2", vec![2u8; 8]),
/// ] {
///     let classification = builder.add_file(FileData {
///         path: path.to_string(),
///         data,
///     })?;
///     println!("added: {} (as type {})", classification.path, classification.role);
/// }
///
/// let package = builder.build()?;
/// assert_eq!(package.len(), 4096 + 16 + 16);
/// # Ok::<(), neosd_gen::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Builder {
    config: Option<Config>,
    metadata: Metadata,
    buckets: RomBuckets,
    classifications: Vec<Classification>,
}

impl Builder {
    /// Create an empty builder for the given metadata
    pub fn new(metadata: Metadata) -> Self {
        Self {
            config: None,
            metadata,
            buckets: RomBuckets::new(),
            classifications: Vec::new(),
        }
    }

    /// Create from JSON config
    ///
    /// Arguments:
    /// - `json`: JSON string
    /// - `default_year`: year to use if the config doesn't provide one,
    ///   normally the current year
    pub fn from_json(json: &str, default_year: u32) -> Result<Self> {
        let config: Config = serde_json::from_str(json).map_err(|e| Error::InvalidConfig {
            error: e.to_string(),
        })?;

        Self::from_config(config, default_year)
    }

    /// Create from an already parsed config
    pub fn from_config(config: Config, default_year: u32) -> Result<Self> {
        Self::validate_config(&config)?;

        let metadata = config.metadata(default_year)?;

        Ok(Self {
            config: Some(config),
            metadata,
            buckets: RomBuckets::new(),
            classifications: Vec::new(),
        })
    }

    fn validate_config(config: &Config) -> Result<()> {
        if config.version != CONFIG_VERSION {
            return Err(Error::UnsupportedConfigVersion {
                version: config.version,
            });
        }

        // Check every file can be classified before anything is loaded
        for file in config.files.iter() {
            if file.is_empty() {
                return Err(Error::InvalidConfig {
                    error: "File name is empty".to_string(),
                });
            }
            classify_path(file)?;
        }

        Ok(())
    }

    /// Optional description from the config
    pub fn description(&self) -> Option<&str> {
        self.config.as_ref().and_then(|c| c.description.as_deref())
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Replace the metadata, e.g. to apply command line overrides to a config
    pub fn set_metadata(&mut self, metadata: Metadata) {
        self.metadata = metadata;
    }

    /// Get list of files from the config that need to be loaded
    pub fn file_specs(&self) -> Vec<FileSpec> {
        let Some(config) = self.config.as_ref() else {
            return Vec::new();
        };

        config
            .files
            .iter()
            .enumerate()
            .filter_map(|(id, source)| {
                // Already checked by validate_config()
                classify_path(source).ok().map(|role| FileSpec {
                    id,
                    source: source.clone(),
                    role,
                })
            })
            .collect()
    }

    /// Add a loaded file - called multiple times, once for each file that
    /// has been loaded, in the order the files should be packed.
    ///
    /// The file is classified using the final component of its path.
    /// Returns the classification so the caller can report it.
    pub fn add_file(&mut self, file: FileData) -> Result<Classification> {
        let role = classify_path(&file.path)?;

        let classification = Classification {
            path: file.path,
            role,
            size: file.data.len(),
        };

        self.buckets.push(role, file.data);
        self.classifications.push(classification.clone());

        Ok(classification)
    }

    /// Files added so far, in order
    pub fn classifications(&self) -> &[Classification] {
        &self.classifications
    }

    pub fn buckets(&self) -> &RomBuckets {
        &self.buckets
    }

    /// Validate whether ready to build
    pub fn build_validation(&self) -> Result<()> {
        self.metadata.validate()?;

        validate_sprite_planes(
            self.buckets.bucket(RomRole::SpritePlaneA),
            self.buckets.bucket(RomRole::SpritePlaneB),
        )?;

        RomSizes::from_buckets(&self.buckets)?;

        Ok(())
    }

    /// Generate the header and payload once all files are loaded
    pub fn build(self) -> Result<Package> {
        self.build_validation()?;

        let Self {
            metadata,
            mut buckets,
            classifications,
            ..
        } = self;

        let sizes = RomSizes::from_buckets(&buckets)?;
        let header = metadata.header(&sizes)?;

        let sprites = sprite_images(&buckets)?;

        let mut chunks = Vec::new();
        for role in [RomRole::Program, RomRole::Fix, RomRole::Sound, RomRole::Sample] {
            chunks.extend(buckets.take(role));
        }
        chunks.extend(sprites);

        Ok(Package {
            sizes,
            header,
            chunks,
            classifications,
        })
    }
}

/// Builds a complete package in one go.
///
/// Files are classified and packed in the order provided.
pub fn assemble<I>(metadata: Metadata, files: I) -> Result<Package>
where
    I: IntoIterator<Item = FileData>,
{
    let mut builder = Builder::new(metadata);
    for file in files {
        builder.add_file(file)?;
    }
    builder.build()
}

// Final component of a `/` or `\` separated path
fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

// Classifies by file name, but reports errors against the full path
fn classify_path(path: &str) -> Result<RomRole> {
    classify(file_name(path)).map_err(|_| Error::UnrecognizedFile {
        path: path.to_string(),
    })
}

/// Result of a successful build
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Package {
    sizes: RomSizes,
    header: Vec<u8>,
    chunks: Vec<Vec<u8>>,
    classifications: Vec<Classification>,
}

impl Package {
    /// The header, always [`HEADER_LEN`](crate::HEADER_LEN) bytes
    pub fn header(&self) -> &[u8] {
        &self.header
    }

    /// Payload chunks in output order: program, fix, sound and sample ROMs,
    /// then one interleaved image per sprite ROM pair
    pub fn payload(&self) -> &[Vec<u8>] {
        &self.chunks
    }

    /// Header followed by every payload chunk, in output order
    pub fn chunks(&self) -> impl Iterator<Item = &[u8]> {
        core::iter::once(self.header.as_slice()).chain(self.chunks.iter().map(Vec::as_slice))
    }

    pub fn sizes(&self) -> &RomSizes {
        &self.sizes
    }

    /// Files included in the package, in the order they were added
    pub fn classifications(&self) -> &[Classification] {
        &self.classifications
    }

    /// Total length of the output, header included
    pub fn len(&self) -> usize {
        self.chunks().map(|chunk| chunk.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The complete output as a single buffer
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.len());
        for chunk in self.chunks() {
            buf.extend_from_slice(chunk);
        }
        buf
    }
}

/// How an added file was classified
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Classification {
    /// Path as provided by the caller
    pub path: String,

    /// Role derived from the file name
    pub role: RomRole,

    /// Size of the file in bytes
    pub size: usize,
}

/// File that needs to be loaded, from the config
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FileSpec {
    /// Position of the file in the config
    pub id: usize,

    /// Path of the file, as given in the config
    pub source: String,

    /// Role the file will be packed as
    pub role: RomRole,
}

/// File data loaded by the caller, passed back to the builder.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FileData {
    /// Path of the file.  Only the final component is used to classify it.
    pub path: String,

    /// File data
    pub data: Vec<u8>,
}

/// NEO-SD build configuration format.
///
/// Every metadata field is optional and falls back to the same default as
/// the command line tool.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "schemars", schemars(title = "NEO-SD Build Configuration"))]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Configuration format version.
    #[cfg_attr(feature = "schemars", schemars(schema_with = "version_schema"))]
    pub version: u32,

    /// Optional description of this configuration.  Not stored in the output.
    pub description: Option<String>,

    /// Game name shown by the NEO-SD menu, up to 32 ASCII characters.
    pub name: Option<String>,

    /// Manufacturer, up to 16 ASCII characters.
    pub company: Option<String>,

    /// Genre shown by the NEO-SD menu.
    pub genre: Option<Genre>,

    /// Year of release.
    pub year: Option<u32>,

    /// NGH number, either as a number or as a string such as `"0x0201"`.
    pub ngh: Option<NghValue>,

    /// ROM files to pack, in order.  Relative paths are resolved by the
    /// caller, normally against the directory holding the config.
    #[serde(default)]
    pub files: Vec<String>,
}

impl Config {
    /// Metadata described by this config
    pub fn metadata(&self, default_year: u32) -> Result<Metadata> {
        let ngh = match &self.ngh {
            Some(ngh) => ngh.value()?,
            None => 0,
        };

        Metadata::new(
            ngh,
            self.name.as_deref().unwrap_or(DEFAULT_NAME),
            self.company.as_deref().unwrap_or(DEFAULT_COMPANY),
            self.genre.unwrap_or_default(),
            self.year.unwrap_or(default_year),
        )
    }
}

#[cfg(feature = "schemars")]
fn version_schema(_gen: &mut schemars::SchemaGenerator) -> schemars::Schema {
    schemars::json_schema!({
        "const": 1
    })
}

/// NGH number as it appears in a config
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(untagged)]
pub enum NghValue {
    Number(u32),
    Text(String),
}

impl NghValue {
    pub fn value(&self) -> Result<u32> {
        match self {
            NghValue::Number(value) => Ok(*value),
            NghValue::Text(text) => parse_ngh(text),
        }
    }
}
