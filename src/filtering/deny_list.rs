// src/filtering/deny_list.rs

use crate::constants::DOC_FILE_NAMES;

/// File-name suffixes that are never decoded.
///
/// Most entries are extensions, but a few (`package-lock.json`, `.DS_Store`)
/// are whole names. Matching is a case-insensitive suffix test on the bare
/// file name, so `.tar.gz` and `package-lock.json` work as written.
pub const BUILTIN_DENIED_SUFFIXES: &[&str] = &[
    // Executables and libraries
    ".exe", ".dll", ".so", ".a", ".lib", ".dylib", ".o", ".obj",
    // Archives
    ".zip", ".tar", ".tar.gz", ".tgz", ".rar", ".7z", ".bz2", ".gz", ".xz", ".z", ".lz",
    ".lzma", ".lzo", ".rz", ".sz", ".dz",
    // Office documents
    ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx", ".odt", ".ods", ".odp",
    // Images
    ".png", ".jpg", ".jpeg", ".gif", ".svg", ".ico", ".icns", ".cur",
    // Audio and video
    ".mp3", ".mp4", ".wav", ".flac", ".ogg", ".avi", ".mkv", ".mov", ".webm", ".wmv", ".m4a",
    ".aac",
    // Disk and VM images
    ".iso", ".vmdk", ".qcow2", ".vdi", ".vhd", ".vhdx", ".ova", ".ovf",
    // Databases
    ".db", ".sqlite", ".mdb", ".accdb", ".frm", ".ibd", ".dbf",
    // JVM
    ".jar", ".class", ".war", ".ear", ".jpi",
    // Python bytecode and packages
    ".pyc", ".pyo", ".pyd", ".egg", ".whl",
    // Packages, dumps and opaque data
    ".deb", ".rpm", ".apk", ".msi", ".dmg", ".pkg", ".bin", ".dat", ".data", ".dump", ".img",
    ".toast", ".vcd", ".crx", ".xpi", ".lockb", "package-lock.json",
    // Fonts
    ".eot", ".otf", ".ttf", ".woff", ".woff2",
    // Windows installer pieces
    ".cab", ".dmp", ".msp", ".msm",
    // Certificates and keys
    ".keystore", ".jks", ".truststore", ".cer", ".crt", ".der", ".p7b", ".p7c", ".p12", ".pfx",
    ".pem", ".csr", ".key", ".pub", ".sig", ".pgp", ".gpg",
    // App bundles
    ".nupkg", ".snupkg", ".appx", ".msix", ".msu", ".snap", ".flatpak", ".appimage",
    // Kernel and firmware
    ".ko", ".sys", ".elf",
    // Flash
    ".swf", ".fla", ".swc",
    // Build and debug artifacts
    ".rlib", ".pdb", ".idb", ".dbg", ".sdf", ".bak", ".tmp", ".temp", ".log", ".tlog", ".ilk",
    // Delphi
    ".bpl", ".dcu", ".dcp", ".dcpil", ".drc",
    // Compiled resources
    ".aps", ".res", ".rsrc", ".rc", ".resx",
    // Settings files
    ".prefs", ".properties", ".ini", ".cfg", ".config", ".conf",
    // VCS and OS metadata
    ".ds_store", ".localized", ".svn", ".git", ".gitignore", ".gitkeep",
];

/// The set of file-name suffixes whose files are reported as binary.
///
/// Suffixes are stored lowercased; lookups lowercase the candidate name.
///
/// # Examples
///
/// ```
/// use repodigest::filtering::DenyList;
///
/// let mut deny = DenyList::default();
/// assert!(deny.is_denied("assets/Logo.PNG"));
/// assert!(deny.is_denied("dist.tar.gz"));
/// assert!(!deny.is_denied("main.rs"));
///
/// deny.extend(vec!["csv".to_string()]);
/// assert!(deny.is_denied("data.csv"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenyList {
    suffixes: Vec<String>,
}

impl Default for DenyList {
    fn default() -> Self {
        let mut suffixes: Vec<String> = Vec::with_capacity(BUILTIN_DENIED_SUFFIXES.len());
        for suffix in BUILTIN_DENIED_SUFFIXES {
            let lowered = suffix.to_lowercase();
            if !suffixes.contains(&lowered) {
                suffixes.push(lowered);
            }
        }
        Self { suffixes }
    }
}

impl DenyList {
    /// An empty deny-list. Every file is decoded.
    pub fn empty() -> Self {
        Self {
            suffixes: Vec::new(),
        }
    }

    /// Adds suffixes. A bare extension such as `csv` is treated as `.csv`.
    pub fn extend<I, S>(&mut self, suffixes: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for suffix in suffixes {
            let suffix = suffix.as_ref().trim();
            if suffix.is_empty() {
                continue;
            }
            let mut lowered = suffix.to_lowercase();
            if !lowered.starts_with('.') && !lowered.contains('.') {
                lowered.insert(0, '.');
            }
            if !self.suffixes.contains(&lowered) {
                self.suffixes.push(lowered);
            }
        }
    }

    /// Returns true if `name` ends with any denied suffix.
    ///
    /// `name` may be a bare file name or a path; only the text after the last
    /// `/` is tested.
    pub fn is_denied(&self, name: &str) -> bool {
        let file_name = name.rsplit('/').next().unwrap_or(name).to_lowercase();
        self.suffixes.iter().any(|s| file_name.ends_with(s.as_str()))
    }

    /// Number of suffixes in the list.
    pub fn len(&self) -> usize {
        self.suffixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suffixes.is_empty()
    }
}

/// Returns true for a README or LICENSE at the repository root.
///
/// Those files have their own sections in the export and are left out of the
/// contents. Nested copies (`packages/core/README.md`) are ordinary files.
pub fn is_doc_file(path: &str) -> bool {
    !path.contains('/') && DOC_FILE_NAMES.contains(&path.to_lowercase().as_str())
}
