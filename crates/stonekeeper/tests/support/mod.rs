//! Sandboxed installation whose `product/bin` holds stub administration
//! executables, so lifecycle tests drive the real subprocess path
//! without a product install.
//!
//! The stubs keep a `.stone-running` marker in the acting stone's data
//! directory: `startstone` creates it, `stopstone` removes it, and
//! `waitstone` reports its presence. The `topaz` stub consumes the
//! scripted session from stdin, creates the full-backup target when the
//! script requests one, and prints either the canned reply placed by
//! [`Sandbox::set_console_reply`] or a digit-free default line.

#![allow(dead_code, reason = "not every stub helper is used by every test binary")]

use std::fs;
use std::os::unix::fs::PermissionsExt;

use camino::{Utf8Path, Utf8PathBuf};
use stonekeeper_config::{Installation, StonePaths, render_config};
use tempfile::TempDir;

const STARTSTONE_STUB: &str = "#!/bin/sh\ntouch \"$GEMSTONE_DATADIR/.stone-running\"\nexit 0\n";

const STOPSTONE_STUB: &str = "#!/bin/sh\nrm -f \"$GEMSTONE_DATADIR/.stone-running\"\nexit 0\n";

const WAITSTONE_STUB: &str = "#!/bin/sh\ntest -f \"$GEMSTONE_DATADIR/.stone-running\"\n";

const STARTNETLDI_STUB: &str = "#!/bin/sh\nexit 0\n";

const STOPNETLDI_STUB: &str = "#!/bin/sh\nexit 0\n";

const GSLIST_STUB: &str = "#!/bin/sh\n\
echo \"Status   Version  Owner  Pid   Port   Started  Type   Name\"\n\
echo \"exists   3.6.5    glass  4242  54321  Aug 05   Stone  ${2:-all}\"\n\
exit 0\n";

const TOPAZ_STUB: &str = "#!/bin/sh\n\
script=$(cat)\n\
backup_target=$(printf '%s\\n' \"$script\" \
| sed -n \"s/.*fullBackupCompressedTo: '\\([^']*\\)'.*/\\1/p\" | head -n 1)\n\
if [ -n \"$backup_target\" ]; then\n\
  : > \"$backup_target\"\n\
fi\n\
if [ -f \"$GEMSTONE_DATADIR/topaz-reply.txt\" ]; then\n\
  cat \"$GEMSTONE_DATADIR/topaz-reply.txt\"\n\
else\n\
  echo \"topaz 1> [Info]: session complete\"\n\
fi\n\
exit 0\n";

/// A throwaway installation rooted in a temp directory.
pub struct Sandbox {
    root: Utf8PathBuf,
    installation: Installation,
    _dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
        let product = root.join("product");
        let bin = product.join("bin");
        fs::create_dir_all(&bin).expect("create product bin");
        for host_dir in ["etc", "data", "log", "backup"] {
            fs::create_dir_all(root.join(host_dir)).expect("create host dir");
        }
        fs::write(bin.join("extent0.dbf"), b"template extent seed\n")
            .expect("write template extent");
        let bootstrap_dir = product.join("seaside/topaz");
        fs::create_dir_all(&bootstrap_dir).expect("create bootstrap dir");
        fs::write(
            bootstrap_dir.join("installMonticello.topaz"),
            "run\nTranscript showCr: 'bootstrap'\n%\n",
        )
        .expect("write bootstrap script");
        write_stub(&bin, "startstone", STARTSTONE_STUB);
        write_stub(&bin, "stopstone", STOPSTONE_STUB);
        write_stub(&bin, "waitstone", WAITSTONE_STUB);
        write_stub(&bin, "gslist", GSLIST_STUB);
        write_stub(&bin, "startnetldi", STARTNETLDI_STUB);
        write_stub(&bin, "stopnetldi", STOPNETLDI_STUB);
        write_stub(&bin, "topaz", TOPAZ_STUB);
        let installation = Installation::new(product)
            .with_config_directory(root.join("etc"))
            .with_data_directory(root.join("data"))
            .with_log_directory(root.join("log"))
            .with_backup_directory(root.join("backup"));
        Self {
            root,
            installation,
            _dir: dir,
        }
    }

    pub fn installation(&self) -> Installation {
        self.installation.clone()
    }

    pub fn root(&self) -> &Utf8Path {
        self.root.as_path()
    }

    pub fn paths_for(&self, name: &str) -> StonePaths {
        StonePaths::new(&self.installation, name)
    }

    /// Sets the reply the stub console prints for sessions against
    /// `name`'s stone.
    pub fn set_console_reply(&self, name: &str, reply: &str) {
        let data_dir = self.installation.data_directory().join(name);
        fs::create_dir_all(&data_dir).expect("create stone data dir");
        fs::write(data_dir.join("topaz-reply.txt"), reply).expect("write console reply");
    }

    /// Pre-seeds a configured, stopped stone without going through the
    /// full create sequence.
    pub fn configure_stone(&self, name: &str) {
        let paths = self.paths_for(name);
        fs::write(paths.config_file(), render_config(&paths)).expect("write stone config");
        for directory in [
            paths.extent_directory(),
            paths.log_directory().to_path_buf(),
            paths.tranlog_directory(),
        ] {
            fs::create_dir_all(directory).expect("create stone dir");
        }
        fs::write(paths.extent_file(), b"seeded extent\n").expect("write stone extent");
    }

    /// Names of the entries currently in the backup directory.
    pub fn backup_entries(&self) -> Vec<String> {
        let mut entries: Vec<String> = fs::read_dir(self.installation.backup_directory())
            .expect("list backup dir")
            .map(|entry| {
                entry
                    .expect("backup dir entry")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        entries.sort();
        entries
    }
}

fn write_stub(bin: &Utf8Path, name: &str, body: &str) {
    let path = bin.join(name);
    fs::write(&path, body).expect("write stub executable");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("mark stub executable");
}
