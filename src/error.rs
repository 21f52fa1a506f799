use thiserror::Error;

/// Startup failures of the effect. Any of these halts the effect; the page
/// simply shows no animation.
#[derive(Debug, Error)]
pub enum EffectError {
    #[error("graphics context unavailable: {0}")]
    ContextUnavailable(String),

    #[error("{stage} shader `{label}` failed to compile:\n{diagnostic}")]
    Compile {
        label: String,
        stage: String,
        diagnostic: String,
    },

    #[error("program `{label}` failed to link: {diagnostic}")]
    Link { label: String, diagnostic: String },

    #[error("program `{program}` has no uniform `{name}`")]
    MissingUniform { program: String, name: String },

    #[error("dom: {0}")]
    Dom(String),
}
