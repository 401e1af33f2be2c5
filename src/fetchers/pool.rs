use crate::fetchers::{FetchError, Fetcher, ScanObserver};
use crate::results::{FetchResult, ResultSet, SiteRecord};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

/// Fetches the homepage of every site with at most `max_concurrency` requests in flight.
///
/// Results are recorded as they complete. The returned map has exactly one
/// entry per distinct origin in `sites`, whether its fetch succeeded or not;
/// repeated origins are fetched once.
///
/// # Arguments
///
/// * `fetcher` - Fetcher shared by every worker
/// * `sites` - Sites to fetch, in list order
/// * `max_concurrency` - Number of workers (at least one is used)
/// * `timeout` - Per-request timeout handed to the fetcher
/// * `observer` - Receives progress and failure notifications
pub async fn fetch_all(
    fetcher: Arc<dyn Fetcher>,
    sites: &[SiteRecord],
    max_concurrency: usize,
    timeout: Duration,
    observer: Arc<dyn ScanObserver>,
) -> ResultSet {
    let origins = distinct_origins(sites);
    let total = origins.len();
    let mut results = ResultSet::with_capacity(total);

    if total == 0 {
        ::log::debug!("No origins to fetch");
        return results;
    }

    let num_workers = max_concurrency.max(1).min(total);
    ::log::info!(
        "Fetching {} homepages with {} workers (timeout {:?})",
        total,
        num_workers,
        timeout
    );
    let start_time = Instant::now();

    // Queue every origin up front; workers stop once it is drained
    let (queue_tx, queue_rx) = mpsc::channel::<String>(total);
    for origin in &origins {
        if queue_tx.send(origin.clone()).await.is_err() {
            break;
        }
    }
    drop(queue_tx);

    let queue_rx = Arc::new(Mutex::new(queue_rx));
    let (result_tx, mut result_rx) = mpsc::channel::<FetchResult>(num_workers);

    let workers = spawn_workers(num_workers, fetcher, queue_rx, result_tx, timeout);

    // The channel closes once every worker has dropped its sender
    let mut completed = 0;
    while let Some(result) = result_rx.recv().await {
        completed += 1;
        record_result(&mut results, result, completed, total, observer.as_ref());
    }

    for (worker_id, handle) in workers.into_iter().enumerate() {
        if let Err(e) = handle.await {
            ::log::error!("Worker {} terminated abnormally: {}", worker_id, e);
        }
    }

    // Only reachable if a worker task itself exits abnormally
    for origin in &origins {
        if !results.contains_key(origin) {
            ::log::error!("No result recorded for {}, marking as failed", origin);
            let result = FetchResult::failed(
                origin.as_str(),
                FetchError::Aborted("worker exited before reporting".to_string()),
            );
            completed += 1;
            record_result(&mut results, result, completed, total, observer.as_ref());
        }
    }

    let failed = results.values().filter(|r| !r.succeeded()).count();
    ::log::info!(
        "Fetched {} homepages ({} failed) in {:.2} seconds",
        results.len(),
        failed,
        start_time.elapsed().as_secs_f64()
    );

    results
}

/// Origins in list order with repeats removed
fn distinct_origins(sites: &[SiteRecord]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(sites.len());
    let mut origins = Vec::with_capacity(sites.len());
    for site in sites {
        if seen.insert(site.origin.as_str()) {
            origins.push(site.origin.clone());
        } else {
            ::log::debug!("Skipping repeated origin: {}", site.origin);
        }
    }
    origins
}

/// Stores one result and notifies the observer
fn record_result(
    results: &mut ResultSet,
    result: FetchResult,
    completed: usize,
    total: usize,
    observer: &dyn ScanObserver,
) {
    if let Some(e) = result.error() {
        observer.fetch_failed(&result.origin, e);
    }
    observer.fetch_completed(&result.origin, completed, total);
    results.insert(result.origin.clone(), result);
}

/// Spawns the worker tasks that drain the origin queue
fn spawn_workers(
    num_workers: usize,
    fetcher: Arc<dyn Fetcher>,
    queue_rx: Arc<Mutex<mpsc::Receiver<String>>>,
    result_tx: mpsc::Sender<FetchResult>,
    timeout: Duration,
) -> Vec<JoinHandle<()>> {
    (0..num_workers)
        .map(|worker_id| {
            spawn_worker(
                worker_id,
                Arc::clone(&fetcher),
                Arc::clone(&queue_rx),
                result_tx.clone(),
                timeout,
            )
        })
        .collect()
}

/// Spawns a single worker
///
/// The worker fetches one origin at a time until the queue is empty, sending
/// each result back as soon as it is available. A fetch that panics only
/// fails its own origin; the worker moves on to the next one.
fn spawn_worker(
    worker_id: usize,
    fetcher: Arc<dyn Fetcher>,
    queue_rx: Arc<Mutex<mpsc::Receiver<String>>>,
    result_tx: mpsc::Sender<FetchResult>,
    timeout: Duration,
) -> JoinHandle<()> {
    ::log::trace!("Spawning worker {}", worker_id);

    tokio::spawn(async move {
        while let Some(origin) = next_origin(worker_id, &queue_rx).await {
            let result = fetch_isolated(worker_id, &fetcher, origin, timeout).await;

            if let Err(e) = result_tx.send(result).await {
                ::log::error!("Worker {} failed to send result: {}", worker_id, e);
                break;
            }
        }

        ::log::debug!("Worker {} finished - no more origins to fetch", worker_id);
    })
}

/// Runs one fetch in its own task so a panic is turned into a failed result
async fn fetch_isolated(
    worker_id: usize,
    fetcher: &Arc<dyn Fetcher>,
    origin: String,
    timeout: Duration,
) -> FetchResult {
    let task_fetcher = Arc::clone(fetcher);
    let task_origin = origin.clone();
    let task = tokio::spawn(async move { task_fetcher.fetch(&task_origin, timeout).await });

    match task.await {
        Ok(result) => result,
        Err(e) => {
            ::log::error!("Worker {} fetch of {} aborted: {}", worker_id, origin, e);
            FetchResult::failed(origin, FetchError::Aborted(e.to_string()))
        }
    }
}

/// Takes the next origin off the shared queue
async fn next_origin(
    worker_id: usize,
    queue_rx: &Arc<Mutex<mpsc::Receiver<String>>>,
) -> Option<String> {
    let mut rx = queue_rx.lock().await;
    let origin = rx.recv().await;
    if let Some(origin) = &origin {
        ::log::trace!("Worker {} fetching: {}", worker_id, origin);
    }
    origin
}
