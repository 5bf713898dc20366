//! The fixed build stages, in execution order.
//!
//! Later stages rely on the filesystem state left by earlier ones, hence
//! the `--no-restore` / `--no-build` flags.

/// One command run inside the build container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage {
    pub name: &'static str,
    pub args: &'static [&'static str],
}

impl Stage {
    pub fn argv(&self) -> Vec<String> {
        self.args.iter().map(|a| a.to_string()).collect()
    }

    pub fn command_line(&self) -> String {
        self.args.join(" ")
    }
}

pub const STAGES: [Stage; 6] = [
    Stage {
        name: "restore",
        args: &["dotnet", "restore"],
    },
    Stage {
        name: "tool restore",
        args: &["dotnet", "tool", "restore"],
    },
    Stage {
        name: "build",
        args: &["dotnet", "build", "--no-restore", "-c", "Release"],
    },
    Stage {
        name: "test",
        args: &["dotnet", "test", "--no-build", "--no-restore", "-c", "Release"],
    },
    Stage {
        name: "pack",
        args: &["dotnet", "pack", "--no-build", "-c", "Release"],
    },
    Stage {
        name: "docs",
        args: &["dotnet", "docfx", "docs/docfx.json"],
    },
];
