use crate::core_types::DirectoryEntry;
use crate::errors::Result;
use crate::source::RepoSource;
use log::debug;
use std::collections::HashSet;

/// Returns the display prefix for the children of `dir_path`.
///
/// The root gets `""`, every other directory `"/" + path`, so the display path
/// of a child is always `"{prefix}/{name}"`.
pub fn display_prefix(dir_path: &str) -> String {
    if dir_path.is_empty() {
        String::new()
    } else {
        format!("/{}", dir_path)
    }
}

/// Calls `visitor(prefix, entry)` for every entry reachable from the root.
///
/// Directories are listed lazily when they are popped from the stack. A
/// directory whose path is already visited is neither pushed nor listed again.
/// With `sort` set, the children of each directory are visited in name order;
/// otherwise they are visited in provider order.
///
/// # Errors
/// The first failing `list_children` call aborts the walk and its error is
/// returned. Entries visited before the failure have already been passed to
/// `visitor`.
pub fn visit<F>(source: &dyn RepoSource, sort: bool, mut visitor: F) -> Result<()>
where
    F: FnMut(&str, &DirectoryEntry),
{
    let mut frontier: Vec<String> = vec![String::new()];
    let mut visited: HashSet<String> = HashSet::new();

    while let Some(dir_path) = frontier.pop() {
        if !visited.insert(dir_path.clone()) {
            continue;
        }
        debug!("Listing directory '{}'", dir_path);
        let mut children = source.list_children(&dir_path)?;
        if sort {
            children.sort_by(|a, b| a.name().cmp(b.name()));
        }

        let prefix = display_prefix(&dir_path);
        for child in &children {
            if let DirectoryEntry::Directory { path, .. } = child {
                if !visited.contains(path) {
                    frontier.push(path.clone());
                }
            }
            visitor(&prefix, child);
        }
    }
    Ok(())
}

/// Concatenates `process(prefix, entry)` over every reachable entry.
///
/// # Examples
///
/// ```
/// use repodigest::discovery::walk;
/// use repodigest::source::MemoryRepo;
///
/// let repo = MemoryRepo::new().with_file("sub/b.md", "world");
/// let listing = walk(&repo, true, |prefix, entry| format!("{}/{}\n", prefix, entry.name()))
///     .unwrap();
/// assert_eq!(listing, "/sub\n/sub/b.md\n");
/// ```
pub fn walk<F>(source: &dyn RepoSource, sort: bool, mut process: F) -> Result<String>
where
    F: FnMut(&str, &DirectoryEntry) -> String,
{
    let mut output = String::new();
    visit(source, sort, |prefix, entry| {
        output.push_str(&process(prefix, entry));
    })?;
    Ok(output)
}
