use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Result, bail};
use futures::FutureExt;
use futures::future::{BoxFuture, join_all};
use log::{debug, error, info};
use tokio::task::{self, JoinHandle};

use super::collector::{ScanCollector, ScanOutput};

type Visitor<T> = dyn Fn(&Path) -> Result<Vec<T>> + Send + Sync;

struct ScanState<T> {
    extension: String,
    visitor: Box<Visitor<T>>,
    collector: ScanCollector<T>,
}

/// Recursively scan `root`, calling `visit` on every file with the given extension.
///
/// Each sub-directory is walked by its own task and each matching file is
/// visited on the blocking pool. The future resolves once every spawned task
/// has finished. A visitor error or panic is logged and recorded in
/// [`ScanOutput::failures`]; it never stops the rest of the scan.
pub async fn scan<T, I, F>(root: &Path, extension: &str, visit: F) -> Result<ScanOutput<T>>
where
    T: Send + 'static,
    I: IntoIterator<Item = T>,
    F: Fn(&Path) -> Result<I> + Send + Sync + 'static,
{
    if !root.is_dir() {
        bail!(
            "Scan root does not exist or is not a directory: {}",
            root.display()
        );
    }

    info!("Scanning {} for .{} files", root.display(), extension);
    let start_time = Instant::now();

    let state = Arc::new(ScanState {
        extension: extension.to_lowercase(),
        visitor: Box::new(move |path: &Path| {
            visit(path).map(|values| values.into_iter().collect())
        }),
        collector: ScanCollector::new(),
    });

    walk_directory(state.clone(), root.to_path_buf()).await;

    let output = state.collector.take();
    info!(
        "Scanned {} in {} ms: {} results, {} failures",
        root.display(),
        start_time.elapsed().as_millis(),
        output.results.len(),
        output.failures.len()
    );

    Ok(output)
}

fn walk_directory<T: Send + 'static>(state: Arc<ScanState<T>>, dir: PathBuf) -> BoxFuture<'static, ()> {
    async move {
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) => {
                state.collector.fail(&dir, format!("cannot read directory: {}", e));
                return;
            }
        };

        let mut dir_tasks: Vec<JoinHandle<()>> = Vec::new();
        let mut file_tasks: Vec<(PathBuf, JoinHandle<()>)> = Vec::new();

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    state.collector.fail(&dir, format!("cannot list directory: {}", e));
                    break;
                }
            };

            let path = entry.path();
            let file_type = match entry.file_type().await {
                Ok(file_type) => file_type,
                Err(e) => {
                    state.collector.fail(&path, format!("cannot stat: {}", e));
                    continue;
                }
            };

            if file_type.is_dir() {
                dir_tasks.push(tokio::spawn(walk_directory(state.clone(), path)));
            } else if file_type.is_file() && has_extension(&path, &state.extension) {
                let task_state = state.clone();
                let task_path = path.clone();
                let handle = task::spawn_blocking(move || visit_file(&task_state, &task_path));
                file_tasks.push((path, handle));
            }
        }

        let (paths, handles): (Vec<_>, Vec<_>) = file_tasks.into_iter().unzip();
        for (path, result) in paths.iter().zip(join_all(handles).await) {
            if let Err(e) = result {
                state.collector.fail(path, format!("visitor task failed: {}", e));
            }
        }

        for result in join_all(dir_tasks).await {
            if let Err(e) = result {
                error!("Directory task under {} failed: {}", dir.display(), e);
            }
        }
    }
    .boxed()
}

fn visit_file<T>(state: &ScanState<T>, path: &Path) {
    debug!("Visiting {}", path.display());
    match (state.visitor)(path) {
        Ok(values) => state.collector.extend(values),
        Err(e) => state.collector.fail(path, format!("{:#}", e)),
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}
