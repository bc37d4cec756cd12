// src/images.rs
//! Profile photos: fetch each record's `imageLink` and inline it as a
//! `data:` URL under `imageBlob`. A failed photo never fails the run; the
//! record just gets `null`.

use std::sync::{atomic::{AtomicUsize, Ordering}, mpsc};
use std::thread;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::blocking::Client;

use crate::core::net::{self, Fetched};
use crate::error::Result;
use crate::progress::Progress;
use crate::record::StudentRecord;

const FALLBACK_MIME: &str = "application/octet-stream";

/// Source of image bytes. The real one is a reqwest client; tests swap in fakes.
pub trait ImageFetcher: Sync {
    fn fetch(&self, url: &str) -> Result<Fetched>;
}

impl ImageFetcher for Client {
    fn fetch(&self, url: &str) -> Result<Fetched> {
        net::http_get(self, url)
    }
}

/// MIME for the payload: an `image/*` Content-Type wins, then magic-byte sniffing.
pub fn detect_mime(bytes: &[u8], content_type: Option<&str>) -> String {
    let declared = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase())
        .filter(|ct| ct.starts_with("image/"));
    if let Some(ct) = declared {
        return ct;
    }
    match image::guess_format(bytes) {
        Ok(fmt) => s!(fmt.to_mime_type()),
        Err(_) => s!(FALLBACK_MIME),
    }
}

pub fn encode_data_url(bytes: &[u8], content_type: Option<&str>) -> String {
    let mime = detect_mime(bytes, content_type);
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Fetch one image; any failure is logged and becomes `None`.
pub fn fetch_and_encode(fetcher: &dyn ImageFetcher, url: &str) -> Option<String> {
    match fetcher.fetch(url) {
        Ok(f) if f.bytes.is_empty() => {
            logw!("Empty image body: {url}");
            None
        }
        Ok(f) => Some(encode_data_url(&f.bytes, f.content_type.as_deref())),
        Err(e) => {
            logw!("Failed to fetch or encode image {url}: {e}");
            None
        }
    }
}

/// Fill `imageBlob` on every record using up to `workers` threads.
/// Results land on the record they belong to regardless of completion order.
pub fn attach_images(
    records: &mut [StudentRecord],
    fetcher: &dyn ImageFetcher,
    workers: usize,
    mut progress: Option<&mut dyn Progress>,
) -> usize {
    if let Some(p) = progress.as_deref_mut() {
        p.begin_images(records.len());
    }

    let mut jobs: Vec<(usize, String)> = Vec::new();
    for (i, rec) in records.iter_mut().enumerate() {
        match rec.image_link() {
            Some(link) => jobs.push((i, s!(link))),
            None => {
                rec.set_image_blob(None);
                if let Some(p) = progress.as_deref_mut() {
                    p.image_skipped(i);
                }
            }
        }
    }
    if jobs.is_empty() {
        return 0;
    }

    let workers = workers.min(jobs.len()).max(1);
    logd!("Fetching {} images on {workers} workers", jobs.len());

    let counter = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel::<(usize, Option<String>)>();
    let mut fetched = 0usize;

    thread::scope(|scope| {
        for _ in 0..workers {
            let tx = tx.clone();
            let jobs = &jobs;
            let counter = &counter;
            scope.spawn(move || {
                loop {
                    let j = counter.fetch_add(1, Ordering::Relaxed);
                    let Some((idx, url)) = jobs.get(j) else { break };
                    let blob = fetch_and_encode(fetcher, url);
                    if tx.send((*idx, blob)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(tx); // main thread is sole receiver now

        for (idx, blob) in rx {
            let ok = blob.is_some();
            if ok { fetched += 1; }
            records[idx].set_image_blob(blob);
            if let Some(p) = progress.as_deref_mut() {
                p.image_done(idx, ok);
            }
        }
    });

    logf!("Images: {fetched}/{} fetched", jobs.len());
    fetched
}
