use std::error;
use std::fmt;

/// Error returned when a configured name cannot be resolved against a catalog
/// or registry.
///
/// Name misses always indicate a content-authoring mistake, so this error is
/// propagated to the caller and never silently absorbed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// A gene name was not found in its catalog.
    Gene { name: String },

    /// An allele name was not found among the alleles of a gene.
    Allele { gene: String, name: String },

    /// A gene group name was not found in its group catalog.
    Group { name: String },

    /// An interpreter name was not registered before genome type loading.
    Interpreter { name: String },

    /// A genome type name was not present in the store.
    GenomeType { name: String },

    /// An initializer name was not defined by the genome type.
    Initializer { name: String },
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gene { name } => write!(f, "Unknown gene name: '{name}'"),
            Self::Allele { gene, name } => {
                write!(f, "Unknown allele name '{name}' for gene '{gene}'")
            }
            Self::Group { name } => write!(f, "Unknown gene group name: '{name}'"),
            Self::Interpreter { name } => {
                write!(f, "Gene interpreter '{name}' is not registered")
            }
            Self::GenomeType { name } => write!(f, "Unknown genome type: '{name}'"),
            Self::Initializer { name } => {
                write!(f, "Unknown genome initializer: '{name}'")
            }
        }
    }
}

impl error::Error for LookupError {}
