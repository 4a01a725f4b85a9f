//! Launchers placed in `Contents/MacOS`.
//!
//! The real executables are hidden as `.ART.bin` and `.ART-cli.bin`. Shell
//! scripts take their place and set up the bundle-relative runtime
//! environment first. The GUI script can additionally be fronted by a small
//! compiled trampoline, see [`trampoline`].

pub mod cli;
pub mod gui;
pub mod trampoline;
mod template;

use crate::bundler::{
    error::Result,
    settings::{ScriptTools, Settings},
};
use handlebars::Handlebars;
use serde::Serialize;

/// Variables the GUI script overrides; their previous values are exported
/// under `<product>_restore_<NAME>` for child processes.
pub const GUI_RESTORED_VARS: [&str; 10] = [
    "GTK_CSD",
    "GDK_PIXBUF_MODULE_FILE",
    "GDK_PIXBUF_MODULEDIR",
    "GIO_MODULE_DIR",
    "DYLD_LIBRARY_PATH",
    "FONTCONFIG_FILE",
    "GTK_PATH",
    "GTK_IM_MODULE_FILE",
    "GSETTINGS_SCHEMA_DIR",
    "XDG_DATA_DIRS",
];

/// Variables the CLI script overrides.
pub const CLI_RESTORED_VARS: [&str; 2] = ["GIO_MODULE_DIR", "DYLD_LIBRARY_PATH"];

/// Values substituted into the templates.
#[derive(Serialize)]
struct TemplateData<'a> {
    shell: String,
    product: &'a str,
    gui_binary: String,
    cli_binary: String,
    gui_script: String,
    restore: Vec<&'static str>,
    tools: &'a ScriptTools,
}

impl<'a> TemplateData<'a> {
    fn new(settings: &'a Settings, restore: &[&'static str]) -> Self {
        let package = settings.package();
        let launcher = settings.launcher();
        Self {
            shell: launcher.shell.display().to_string(),
            product: &package.product_name,
            gui_binary: package.hidden_gui_binary(),
            cli_binary: package.hidden_cli_binary(),
            gui_script: package.hidden_gui_script(),
            restore: restore.to_vec(),
            tools: &launcher.tools,
        }
    }
}

fn registry() -> Result<Handlebars<'static>> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars.register_partial("module_caches", template::MODULE_CACHES)?;
    for (name, source) in [
        ("shebang", template::SHEBANG),
        ("restore_env", template::RESTORE_ENV),
        ("locate_resolved", template::LOCATE_RESOLVED),
        ("locate_relative", template::LOCATE_RELATIVE),
        ("gui_env", template::GUI_ENV),
        ("direct_caches", template::DIRECT_CACHES),
        ("bus_guard", template::BUS_GUARD),
        ("run_gui", template::RUN_GUI),
        ("run_gui_debug", template::RUN_GUI_DEBUG),
        ("direct_cleanup", template::DIRECT_CLEANUP),
        ("bus_cleanup", template::BUS_CLEANUP),
        ("cli_env", template::CLI_ENV),
        ("trampoline_c", template::TRAMPOLINE_C),
    ] {
        handlebars.register_template_string(name, source)?;
    }
    Ok(handlebars)
}

/// Renders the named blocks in order and concatenates them.
fn render_blocks(blocks: &[&str], data: &TemplateData<'_>) -> Result<String> {
    let handlebars = registry()?;
    let mut out = String::new();
    for block in blocks {
        out.push_str(&handlebars.render(block, data)?);
    }
    Ok(out)
}
