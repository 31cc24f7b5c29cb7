//! The toolkit commands the dispatcher knows how to build.
//!
//! Argument vectors are `leon` templates; `{name}` placeholders are filled
//! from validated user input and always render to exactly one argument.

use std::fmt::{Display, Formatter};

use crate::event::Pane;

/// A free-text input a tool needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDefinition {
    /// Placeholder name used in the templates.
    pub key: &'static str,
    /// Completes "Please enter ..." when the field is left blank.
    pub prompt: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolDefinition {
    pub id: &'static str,
    /// Fixed leading arguments, executable first.
    pub command: &'static [&'static str],
    /// Arguments placed after any optional flags.
    pub trailing: &'static [&'static str],
    pub fields: &'static [FieldDefinition],
    pub pane: Pane,
    /// Whether runs also feed the pane's progress sink.
    pub progress: bool,
}

impl ToolDefinition {
    /// Status shown before the command line itself is known.
    pub fn status_text(&self) -> String {
        format!("Running {}...", self.id)
    }
}

impl Display for ToolDefinition {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        let arguments: Vec<&str> = self.command.iter().chain(self.trailing).copied().collect();
        formatter.write_str(arguments.join(" ").as_str())
    }
}

const fn field(key: &'static str, prompt: &'static str) -> FieldDefinition {
    FieldDefinition { key, prompt }
}

pub const PREFETCH: ToolDefinition = ToolDefinition {
    id: "prefetch",
    command: &["prefetch", "--progress"],
    trailing: &["{accession}"],
    fields: &[field("accession", "an accession for prefetch")],
    pane: Pane::Download,
    progress: true,
};

pub const SRAPATH: ToolDefinition = ToolDefinition {
    id: "srapath",
    command: &["srapath"],
    trailing: &["{accession}"],
    fields: &[field("accession", "an accession for srapath")],
    pane: Pane::Download,
    progress: true,
};

pub const FASTQ_DUMP: ToolDefinition = ToolDefinition {
    id: "fastq-dump",
    command: &["fastq-dump", "--progress"],
    trailing: &["{file}"],
    fields: &[field("file", "the SRA file path for fastq-dump")],
    pane: Pane::Conversion,
    progress: true,
};

pub const BAM_LOAD: ToolDefinition = ToolDefinition {
    id: "bam-load",
    command: &["bam-load", "-o", "{output}"],
    trailing: &["{input}"],
    fields: &[
        field("input", "the BAM file path"),
        field("output", "the output SRA filename"),
    ],
    pane: Pane::Upload,
    progress: true,
};

pub const VDB_DUMP: ToolDefinition = ToolDefinition {
    id: "vdb-dump",
    command: &["vdb-dump"],
    trailing: &["{file}"],
    fields: &[field("file", "the SRA file path for vdb-dump")],
    pane: Pane::Utilities,
    progress: true,
};

pub const RCEXPLAIN: ToolDefinition = ToolDefinition {
    id: "rcexplain",
    command: &["rcexplain"],
    trailing: &["{file}"],
    fields: &[field("file", "the SRA file path for rcexplain")],
    pane: Pane::Utilities,
    progress: true,
};

pub const READ_FILTER_REDACT: ToolDefinition = ToolDefinition {
    id: "read-filter-redact",
    command: &["read-filter-redact"],
    trailing: &["{file}"],
    fields: &[field("file", "the SRA file path for read-filter-redact")],
    pane: Pane::Utilities,
    progress: true,
};

pub const VDB_CONFIG: ToolDefinition = ToolDefinition {
    id: "vdb-config",
    command: &["vdb-config", "-i"],
    trailing: &[],
    fields: &[],
    pane: Pane::Configuration,
    progress: true,
};

pub const SET_AWS_CREDENTIALS: ToolDefinition = ToolDefinition {
    id: "vdb-config",
    command: &["vdb-config", "--set-aws-credentials"],
    trailing: &["{path}"],
    fields: &[field("path", "the path to your AWS credentials file")],
    pane: Pane::Configuration,
    progress: true,
};

pub const SET_GCP_CREDENTIALS: ToolDefinition = ToolDefinition {
    id: "vdb-config",
    command: &["vdb-config", "--set-gcp-credentials"],
    trailing: &["{path}"],
    fields: &[field("path", "the path to your GCP credentials file")],
    pane: Pane::Configuration,
    progress: true,
};

pub const SRA_VALIDATOR: ToolDefinition = ToolDefinition {
    id: "sra-validator",
    command: &["sra-validator"],
    trailing: &["{file}"],
    fields: &[field("file", "the SRA file path for validation")],
    pane: Pane::Validator,
    progress: true,
};

pub const VDB_COPY: ToolDefinition = ToolDefinition {
    id: "vdb-copy",
    command: &["vdb-copy", "{source}"],
    trailing: &["{destination}"],
    fields: &[
        field("source", "the source VDB file for vdb-copy"),
        field("destination", "the destination for vdb-copy"),
    ],
    pane: Pane::Advanced,
    progress: false,
};

pub const ABI_DUMP: ToolDefinition = ToolDefinition {
    id: "abi-dump",
    command: &["abi-dump"],
    trailing: &["{file}"],
    fields: &[field("file", "the SRA file path for abi-dump")],
    pane: Pane::Advanced,
    progress: false,
};

pub const SRA_SORT: ToolDefinition = ToolDefinition {
    id: "sra-sort",
    command: &["sra-sort"],
    trailing: &["{file}"],
    fields: &[field("file", "the SRA file path for sra-sort")],
    pane: Pane::Advanced,
    progress: false,
};

pub const KAR: ToolDefinition = ToolDefinition {
    id: "kar",
    command: &["kar", "create", "-o", "{output}"],
    trailing: &["{directory}"],
    fields: &[
        field("directory", "the directory to package for kar"),
        field("output", "the output KAR file name"),
    ],
    pane: Pane::Advanced,
    progress: false,
};

pub const ALL_TOOLS: &[ToolDefinition] = &[
    PREFETCH,
    SRAPATH,
    FASTQ_DUMP,
    BAM_LOAD,
    VDB_DUMP,
    RCEXPLAIN,
    READ_FILTER_REDACT,
    VDB_CONFIG,
    SET_AWS_CREDENTIALS,
    SET_GCP_CREDENTIALS,
    SRA_VALIDATOR,
    VDB_COPY,
    ABI_DUMP,
    SRA_SORT,
    KAR,
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolation::{get_templates, get_tokens};

    #[test]
    fn test_every_placeholder_has_a_field() {
        for tool in ALL_TOOLS {
            let arguments: Vec<&str> = tool.command.iter().chain(tool.trailing).copied().collect();
            let templates = get_templates(&arguments).unwrap();
            let tokens = get_tokens(&templates);

            assert_eq!(tokens.len(), tool.fields.len(), "{tool}");
            for field in tool.fields {
                assert!(tokens.contains(field.key), "{} missing {}", tool, field.key);
            }
        }
    }

    #[test]
    fn test_status_text() {
        assert_eq!(PREFETCH.status_text(), "Running prefetch...");
        assert_eq!(SRA_VALIDATOR.status_text(), "Running sra-validator...");
    }

    #[test]
    fn test_display_shows_template() {
        assert_eq!(BAM_LOAD.to_string(), "bam-load -o {output} {input}");
    }

    #[test]
    fn test_extra_tools_skip_progress() {
        for tool in [VDB_COPY, ABI_DUMP, SRA_SORT, KAR] {
            assert!(!tool.progress);
            assert_eq!(tool.pane, Pane::Advanced);
        }
    }
}
