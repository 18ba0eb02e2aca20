//! Modules that never need installing.
//!
//! The list is the CPython 3 standard library plus modules that ship with
//! every virtual environment. Anything missing here shows up as a false
//! "missing package" report; extend it through `dependencies.extra_allowlist`
//! rather than guessing at runtime.

use std::collections::{BTreeMap, BTreeSet};

const STDLIB_MODULES: &[&str] = &[
    "abc", "aifc", "antigravity", "argparse", "array", "ast", "asynchat", "asyncio",
    "asyncore", "atexit", "audioop", "base64", "bdb", "binascii", "bisect", "builtins",
    "bz2", "cProfile", "calendar", "cgi", "cgitb", "chunk", "cmath", "cmd", "code",
    "codecs", "codeop", "collections", "colorsys", "compileall", "concurrent",
    "configparser", "contextlib", "contextvars", "copy", "copyreg", "crypt", "csv",
    "ctypes", "curses", "dataclasses", "datetime", "dbm", "decimal", "difflib", "dis",
    "distutils", "doctest", "email", "encodings", "ensurepip", "enum", "errno",
    "faulthandler", "fcntl", "filecmp", "fileinput", "fnmatch", "fractions", "ftplib",
    "functools", "gc", "genericpath", "getopt", "getpass", "gettext", "glob", "graphlib",
    "grp", "gzip", "hashlib", "heapq", "hmac", "html", "http", "idlelib", "imaplib",
    "imghdr", "imp", "importlib", "inspect", "io", "ipaddress", "itertools", "json",
    "keyword", "lib2to3", "linecache", "locale", "logging", "lzma", "mailbox", "mailcap",
    "marshal", "math", "mimetypes", "mmap", "modulefinder", "msilib", "msvcrt",
    "multiprocessing", "netrc", "nis", "nntplib", "nt", "ntpath", "nturl2path", "numbers",
    "opcode", "operator", "optparse", "os", "ossaudiodev", "pathlib", "pdb", "pickle",
    "pickletools", "pipes", "pkgutil", "platform", "plistlib", "poplib", "posix",
    "posixpath", "pprint", "profile", "pstats", "pty", "pwd", "py_compile", "pyclbr",
    "pydoc", "pydoc_data", "pyexpat", "queue", "quopri", "random", "re", "readline",
    "reprlib", "resource", "rlcompleter", "runpy", "sched", "secrets", "select",
    "selectors", "shelve", "shlex", "shutil", "signal", "site", "smtpd", "smtplib",
    "sndhdr", "socket", "socketserver", "spwd", "sqlite3", "sre_compile",
    "sre_constants", "sre_parse", "ssl", "stat", "statistics", "string", "stringprep",
    "struct", "subprocess", "sunau", "symtable", "sys", "sysconfig", "syslog", "tabnanny",
    "tarfile", "telnetlib", "tempfile", "termios", "textwrap", "this", "threading", "time",
    "timeit", "tkinter", "token", "tokenize", "tomllib", "trace", "traceback",
    "tracemalloc", "tty", "turtle", "turtledemo", "types", "typing", "unicodedata",
    "unittest", "urllib", "uu", "uuid", "venv", "warnings", "wave", "weakref",
    "webbrowser", "winreg", "winsound", "wsgiref", "xdrlib", "xml", "xmlrpc", "zipapp",
    "zipfile", "zipimport", "zlib", "zoneinfo",
];

/// Present in any environment created by venv or virtualenv.
const PREINSTALLED_MODULES: &[&str] = &["pip", "setuptools", "pkg_resources", "wheel"];

/// Import names whose distribution on the package index is named differently.
const KNOWN_DISTRIBUTIONS: &[(&str, &str)] = &[
    ("PIL", "pillow"),
    ("attr", "attrs"),
    ("bs4", "beautifulsoup4"),
    ("cv2", "opencv-python"),
    ("dateutil", "python-dateutil"),
    ("dotenv", "python-dotenv"),
    ("jwt", "PyJWT"),
    ("serial", "pyserial"),
    ("sklearn", "scikit-learn"),
    ("skimage", "scikit-image"),
    ("yaml", "pyyaml"),
];

/// Module names treated as always available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltinAllowlist {
    modules: BTreeSet<String>,
}

impl Default for BuiltinAllowlist {
    fn default() -> Self {
        Self::standard()
    }
}

impl BuiltinAllowlist {
    /// Standard library plus the packaging toolchain.
    pub fn standard() -> Self {
        Self::from_names(STDLIB_MODULES.iter().chain(PREINSTALLED_MODULES).copied())
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            modules: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with_extra<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modules.extend(names.into_iter().map(Into::into));
        self
    }

    /// Private C accelerator modules (`_thread`, `_csv`, ...) are always built in.
    pub fn contains(&self, module: &str) -> bool {
        module.starts_with('_') || self.modules.contains(module)
    }
}

/// Distribution name to hand to the installer for an import name.
pub fn distribution_name<'a>(module: &'a str, overrides: &'a BTreeMap<String, String>) -> &'a str {
    if let Some(name) = overrides.get(module) {
        return name;
    }
    KNOWN_DISTRIBUTIONS
        .iter()
        .find(|(import, _)| *import == module)
        .map(|(_, dist)| *dist)
        .unwrap_or(module)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_allowlist_covers_stdlib() {
        let allowlist = BuiltinAllowlist::standard();
        for module in ["os", "sys", "json", "asyncio", "tomllib", "pip", "__future__", "_thread"] {
            assert!(allowlist.contains(module), "{} should be allowlisted", module);
        }
        assert!(!allowlist.contains("requests"));
    }

    #[test]
    fn test_extra_entries() {
        let allowlist = BuiltinAllowlist::from_names(["os"]).with_extra(["numpy"]);
        assert!(allowlist.contains("numpy"));
        assert!(!allowlist.contains("json"));
    }

    #[test]
    fn test_distribution_name_mapping() {
        let mut overrides = BTreeMap::new();
        overrides.insert("magic".to_string(), "python-magic".to_string());

        assert_eq!(distribution_name("cv2", &overrides), "opencv-python");
        assert_eq!(distribution_name("magic", &overrides), "python-magic");
        assert_eq!(distribution_name("requests", &overrides), "requests");
    }
}
