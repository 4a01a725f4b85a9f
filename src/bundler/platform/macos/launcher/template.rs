//! Handlebars templates for the launchers.
//!
//! Rendered with escaping disabled. Every script block ends with a newline so
//! blocks can be concatenated.

pub(super) const SHEBANG: &str = "#!{{shell}}\n";

pub(super) const RESTORE_ENV: &str = "\
{{#each restore}}export {{../product}}_restore_{{this}}=${{this}}
{{/each}}";

/// Resolves `$d` to `Contents`, following symlinks to the script.
pub(super) const LOCATE_RESOLVED: &str = r#"
d="$({{tools.dirname}} "$({{tools.realpath}} "$0")")"
d="$({{tools.realpath}} "${d}/..")"
"#;

pub(super) const LOCATE_RELATIVE: &str = r#"
d=$({{tools.dirname}} "$0")/..
"#;

pub(super) const GUI_ENV: &str = r#"
export DYLD_LIBRARY_PATH="$d/Frameworks"
export GTK_CSD=0
export GDK_PIXBUF_MODULEDIR="$d/Frameworks"
export FONTCONFIG_FILE="$d/Resources/fonts.conf"
export GTK_PATH="$d/Resources/etc/gtk-3.0"
export GSETTINGS_SCHEMA_DIR="$d/Resources/share/glib-2.0/schemas"
export XDG_DATA_DIRS="$d/Resources/share"
export GDK_RENDERING=similar
export {{product}}_EXIFTOOL_BASE_DIR="$d/Resources/exiftool"
"#;

pub(super) const MODULE_CACHES: &str = r#"    "$d/Resources/gdk-pixbuf-query-loaders" "$d/Frameworks/"libpixbufloader-svg.so > "$t/loader.cache"
    "$d/Resources/gtk-query-immodules-3.0" "$d"/Frameworks/im-*.so > "$t/gtk.immodules"
"#;

pub(super) const DIRECT_CACHES: &str = r#"
t=$({{tools.mktemp}} -d)
{{> module_caches}}export GDK_PIXBUF_MODULE_FILE="$t/loader.cache"
export GTK_IM_MODULE_FILE="$t/gtk.immodules"
export GTK_OVERLAY_SCROLLING=0
"#;

/// Starts the private session bus unless a live one already owns the socket.
///
/// The `mkdir` lock serialises concurrent launches between the probe and the
/// daemon start. Only the launch that took the lock removes it. `DBUS_PID` is
/// non-empty only in the launch that started the daemon.
pub(super) const BUS_GUARD: &str = r#"
t="${TMPDIR}{{product}}-${USER}"
{{tools.mkdir}} -p "$t"

DBUS_SOCK_FILE="$t/dbus.sock"
export DBUS_SESSION_BUS_ADDRESS="unix:path=$DBUS_SOCK_FILE"
DBUS_PID=""

lock="$t/dbus.lock"
have_lock=0
n=0
while [ $n -lt 50 ]; do
    if {{tools.mkdir}} "$lock" 2>/dev/null; then
        have_lock=1
        break
    fi
    n=$((n + 1))
    {{tools.sleep}} 0.1
done
if ! {{tools.socket_probe}} "$DBUS_SOCK_FILE" >/dev/null 2>&1; then
    {{tools.rm}} -f "$DBUS_SOCK_FILE"
    DBUS_PID=$("$d/Resources/dbus-daemon" --fork --print-pid --config-file="$d/Resources/dbus-1/session.conf" --address "$DBUS_SESSION_BUS_ADDRESS")
{{> module_caches}}fi
if [ $have_lock -eq 1 ]; then
    {{tools.rmdir}} "$lock"
fi

export GDK_PIXBUF_MODULE_FILE="$t/loader.cache"
export GTK_IM_MODULE_FILE="$t/gtk.immodules"
"#;

pub(super) const RUN_GUI: &str = r#"
"$d/MacOS/{{gui_binary}}" "$@"
status=$?
"#;

/// The program's exit status travels back on fd 3 so the pipe into `tee`
/// does not mask it. fd 4 carries the terminal output past the capture.
pub(super) const RUN_GUI_DEBUG: &str = r#"
export ASAN_OPTIONS=detect_container_overflow=0:new_delete_type_mismatch=0:halt_on_error=0
exec 4>&1
status=$( { { "$d/MacOS/{{gui_binary}}" "$@" 2>&1 3>&- 4>&-; echo $? >&3; } | {{tools.tee}} "${HOME}/{{product}}.log" >&4; } 3>&1 )
exec 4>&-
"#;

pub(super) const DIRECT_CLEANUP: &str = r#"{{tools.rm}} -rf "$t"
exit $status
"#;

pub(super) const BUS_CLEANUP: &str = r#"if [ -n "$DBUS_PID" ]; then
    {{tools.rm}} -rf "$t"
    kill $DBUS_PID
    {{tools.rm}} -f "$DBUS_SOCK_FILE"
fi
exit $status
"#;

pub(super) const CLI_ENV: &str = r#"export DYLD_LIBRARY_PATH="$d/Frameworks"
export {{product}}_EXIFTOOL_BASE_DIR="$d/Resources/exiftool"
exec "$d/MacOS/{{cli_binary}}" "$@"
"#;

pub(super) const TRAMPOLINE_C: &str = r#"#include <unistd.h>
#include <stdlib.h>
#include <string.h>
#include <libgen.h>
#include <stdio.h>

int main(int argc, char *const argv[])
{
    char buf[4096];
    char *d0 = realpath(argv[0], NULL);
    if (!d0) {
        perror("{{product}}-launcher");
        return 1;
    }
    strlcpy(buf, d0, sizeof(buf));
    free(d0);
    d0 = dirname(buf);

    char script[4096];
    strlcpy(script, d0, sizeof(script));
    strlcat(script, "/{{gui_script}}", sizeof(script));
    strlcpy(buf, "{{shell}}", sizeof(buf));

    char **newargs = (char **)malloc(sizeof(char *) * (argc + 2));
    newargs[0] = buf;
    newargs[1] = script;
    for (int i = 1; i < argc; ++i) {
        newargs[i + 1] = argv[i];
    }
    newargs[argc + 1] = NULL;

    const char *dbg = getenv("{{product}}_DEBUG");
    if (dbg && atoi(dbg)) {
        fprintf(stderr, "{{product}}-launcher - running: %s %s", newargs[0], newargs[1]);
        for (int i = 1; i < argc; ++i) {
            fprintf(stderr, " %s", newargs[i + 1]);
        }
        fprintf(stderr, "\n");
    }
    execv(buf, newargs);
    perror("{{product}}-launcher");
    return 1;
}
"#;
