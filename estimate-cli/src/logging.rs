use anyhow::{Result, anyhow, bail};
use chrono::Local;
use std::{
    fs::File,
    io::{self, IsTerminal, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError},
};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        FmtContext, MakeWriter,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    reload,
    util::SubscriberInitExt,
};

// --- Formatter ---

/// `2026-03-04T09:15:02.118-08:00  INFO estimate_core::wizard:88 message`
struct LocalFmt;

/// Writes `text` wrapped in `style` when the writer takes ANSI codes.
fn paint(writer: &mut Writer<'_>, style: &str, text: impl std::fmt::Display) -> std::fmt::Result {
    if writer.has_ansi_escapes() {
        write!(writer, "\x1b[{style}m{text}\x1b[0m ")
    } else {
        write!(writer, "{text} ")
    }
}

fn level_style(level: Level) -> &'static str {
    match level {
        Level::ERROR => "1;31",
        Level::WARN => "1;33",
        Level::INFO => "1;32",
        Level::DEBUG => "1;34",
        Level::TRACE => "1;35",
    }
}

impl<S, N> FormatEvent<S, N> for LocalFmt
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();

        paint(&mut writer, "2", Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z"))?;
        paint(&mut writer, level_style(*meta.level()), format_args!("{:>5}", meta.level()))?;
        // Module path rather than file: every crate has a src/repository.rs.
        if let (Some(module), Some(line)) = (meta.module_path(), meta.line()) {
            paint(&mut writer, "36", format_args!("{module}:{line}"))?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

// --- Late-bound file writer ---

/// Writer that can be pointed at a file after the subscriber is installed.
/// Records are dropped while no file is set.
#[derive(Clone, Default)]
struct FileSlot(Arc<Mutex<Option<File>>>);

impl FileSlot {
    fn lock(&self) -> MutexGuard<'_, Option<File>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct SlotWriter<'a>(MutexGuard<'a, Option<File>>);

impl Write for SlotWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut *self.0 {
            Some(f) => f.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut *self.0 {
            Some(f) => f.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for FileSlot {
    type Writer = SlotWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        SlotWriter(self.lock())
    }
}

// --- Statics ---

type SetStrFn = Box<dyn Fn(&str) -> Result<()> + Send + Sync>;

static SET_LOG_LEVEL: OnceLock<SetStrFn> = OnceLock::new();
static FILE_SLOT: OnceLock<FileSlot> = OnceLock::new();

/// `RUST_LOG` wins over the configured level when it is set and non-empty.
fn filter_directive(configured: &str, env: Option<&str>) -> String {
    match env.map(str::trim) {
        Some(directive) if !directive.is_empty() => directive.to_string(),
        _ => configured.trim().to_ascii_lowercase(),
    }
}

fn make_filter(directive: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directive).map_err(|e| anyhow!("invalid log level '{directive}': {e}"))
}

fn env_directive() -> Option<String> {
    std::env::var(EnvFilter::DEFAULT_ENV).ok()
}

fn store_level_handle<S>(handle: reload::Handle<EnvFilter, S>)
where
    S: Subscriber + Send + Sync + 'static,
{
    let _ = SET_LOG_LEVEL.set(Box::new(move |directive: &str| {
        let filter = make_filter(directive)?;
        handle
            .reload(filter)
            .map_err(|e| anyhow!("filter reload failed: {e}"))
    }));
}

// --- Public API ---

/// Installs the global subscriber at `info` (or `RUST_LOG`). Call once at
/// startup, before the config file is read.
///
/// Records go to stderr so estimate output on stdout stays clean; stderr is
/// colored only when it is a terminal.
pub fn init_logging() -> Result<()> {
    let filter = make_filter(&filter_directive("info", env_directive().as_deref()))?;

    let slot = FILE_SLOT.get_or_init(FileSlot::default).clone();
    let (level_filter, level_handle) = reload::Layer::new(filter);

    let stderr_layer = tracing_subscriber::fmt::layer()
        .event_format(LocalFmt)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal());

    let file_layer = tracing_subscriber::fmt::layer()
        .event_format(LocalFmt)
        .with_ansi(false)
        .with_writer(slot);

    tracing_subscriber::registry()
        .with(level_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("logging already initialized: {e}"))?;

    store_level_handle(level_handle);
    Ok(())
}

/// Switches to the configured level once it is known.
///
/// Accepts a bare level ("warn", "debug", ...) or any `EnvFilter` directive,
/// case-insensitively. When `RUST_LOG` is set it stays in effect.
pub fn set_log_level(level: &str) -> Result<()> {
    let directive = filter_directive(level, env_directive().as_deref());
    match SET_LOG_LEVEL.get() {
        Some(f) => f(&directive),
        None => bail!("logging not yet initialized"),
    }
}

/// Appends log records to `path` from now on, replacing any open log file.
/// Missing parent directories are created.
pub fn enable_file_logging(path: &Path) -> Result<()> {
    let Some(slot) = FILE_SLOT.get() else {
        bail!("logging not yet initialized");
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| anyhow!("cannot create log directory '{}': {e}", parent.display()))?;
    }
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| anyhow!("cannot open log file '{}': {e}", path.display()))?;

    *slot.lock() = Some(file);
    Ok(())
}
