use thiserror::Error;

/// Fatal rendering faults. Anything here aborts the render: a partially emitted
/// document is never valid output.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("no handler for node \"{kind}\" at line {line}: {text}")]
    UnsupportedNode {
        kind: String,
        line: usize,
        text: String,
    },
    #[error("node \"{kind}\" is missing required attribute \"{attribute}\"")]
    MissingAttribute { kind: String, attribute: String },
    #[error("section nesting deeper than {max} levels at line {line}")]
    SectionDepth { max: usize, line: usize },
    #[error("unable to read image \"{uri}\": {source}")]
    ImageRead {
        uri: String,
        #[source]
        source: ImageReadError,
    },
}

/// Faults from the image-metadata collaborator. Only size and format are ever read;
/// decoding errors cannot occur here.
#[derive(Error, Debug)]
pub enum ImageReadError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error("could not determine image format")]
    UnknownFormat,
}
