//! Renders the configuration file written for a freshly created stone.
//!
//! The template is deliberately small: it wires the stone to its extent,
//! transaction-log, and scratch locations and fixes the cache sizes a
//! bare stone starts with. Anything richer belongs in the operator's own
//! configuration management, not here.

use crate::stone_paths::StonePaths;

/// Produces the contents of `NAME.conf` for a new stone.
///
/// The transaction-log directory is listed twice: the stone alternates
/// between the configured locations when a segment fills, and a single
/// directory repeated keeps that rotation on one filesystem.
pub fn render_config(paths: &StonePaths) -> String {
    let extent = paths.extent_file();
    let tranlog = paths.tranlog_directory();
    let scratch = paths.scratch_directory();
    format!(
        "DBF_EXTENT_NAMES = \"{extent}\";\n\
         DBF_SCRATCH_DIR = \"{scratch}/\";\n\
         STN_TRAN_LOG_DIRECTORIES = \"{tranlog}/\", \"{tranlog}/\";\n\
         STN_TRAN_LOG_SIZES = 100, 100;\n\
         STN_TRAN_FULL_LOGGING = TRUE;\n\
         GEM_TEMPOBJ_CACHE_SIZE = 50000;\n\
         SHR_PAGE_CACHE_SIZE_KB = 131072;\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::installation::Installation;

    #[test]
    fn substitutes_the_stone_layout() {
        let installation = Installation::new("/opt/gemstone/product");
        let paths = StonePaths::new(&installation, "demo");
        let rendered = render_config(&paths);
        assert!(rendered.contains("/var/local/gemstone/demo/extent/extent0.dbf"));
        assert!(
            rendered.contains(
                "STN_TRAN_LOG_DIRECTORIES = \"/var/local/gemstone/demo/tranlog/\", \
                 \"/var/local/gemstone/demo/tranlog/\";"
            )
        );
        assert!(rendered.contains("DBF_SCRATCH_DIR = \"/var/local/gemstone/demo/scratch/\";"));
        assert!(rendered.ends_with('\n'));
    }
}
