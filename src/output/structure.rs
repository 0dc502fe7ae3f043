// src/output/structure.rs

use crate::core_types::DirectoryEntry;

/// Renders one line of the structure listing.
///
/// Directories end with `/`, files do not.
///
/// ```
/// use repodigest::core_types::DirectoryEntry;
/// use repodigest::output::structure_line;
///
/// assert_eq!(structure_line("", &DirectoryEntry::directory("sub", "sub")), "/sub/\n");
/// assert_eq!(structure_line("/sub", &DirectoryEntry::file("b.md", "sub/b.md")), "/sub/b.md\n");
/// ```
pub fn structure_line(prefix: &str, entry: &DirectoryEntry) -> String {
    match entry {
        DirectoryEntry::Directory { name, .. } => format!("{}/{}/\n", prefix, name),
        DirectoryEntry::File { name, .. } => format!("{}/{}\n", prefix, name),
    }
}
