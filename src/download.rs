// src/download.rs
//! Fetching the raw inputs the merge needs: the WFS survey CSVs and the species
//! reference feed.

use std::{
    path::{Path, PathBuf},
    sync::{mpsc, Arc, atomic::{AtomicUsize, Ordering}},
    thread,
};

use crate::{
    config::options::DownloadOptions,
    core::Fetch,
    data::ReferenceSpecies,
    error::{Error, Result},
    file,
    progress::Progress,
};

/// Download every configured survey data type into `dest/<type>.csv`.
///
/// `dest` must be empty (it is created when missing). Files are fetched by a
/// small worker pool; the first failure fails the whole download once the
/// other workers have finished.
pub fn download_survey_data<F: Fetch + 'static>(
    fetcher: Arc<F>,
    opts: &DownloadOptions,
    dest: &Path,
    mut progress: Option<&mut dyn Progress>,
) -> Result<Vec<PathBuf>> {
    file::verify_empty_dir(dest)?;

    let jobs: Arc<Vec<(String, String, PathBuf)>> = Arc::new(
        opts.data_types
            .iter()
            .map(|t| (t.clone(), opts.url_for(t), dest.join(format!("{t}.csv"))))
            .collect(),
    );

    if let Some(p) = progress.as_deref_mut() {
        p.begin(jobs.len());
    }

    type JobOk = (String, PathBuf, u64);
    type JobErr = (String, Error);

    let counter = Arc::new(AtomicUsize::new(0));
    let (res_tx, res_rx) = mpsc::channel::<std::result::Result<JobOk, JobErr>>();
    let workers = opts.workers.min(jobs.len()).max(1);

    for _ in 0..workers {
        let jobs = Arc::clone(&jobs);
        let idx = Arc::clone(&counter);
        let fetcher = Arc::clone(&fetcher);
        let tx = res_tx.clone();

        thread::spawn(move || {
            loop {
                let i = idx.fetch_add(1, Ordering::Relaxed);
                if i >= jobs.len() {
                    break;
                }
                let (data_type, url, path) = &jobs[i];
                logf!("Downloading {data_type} from {url}");
                let result = match fetcher.get_to_file(url, path) {
                    Ok(n) => Ok((data_type.clone(), path.clone(), n)),
                    Err(e) => Err((data_type.clone(), e)),
                };
                if tx.send(result).is_err() {
                    break;
                }
            }
        });
    }
    drop(res_tx);

    let mut written = Vec::with_capacity(jobs.len());
    let mut first_err: Option<Error> = None;

    for result in res_rx {
        match result {
            Ok((data_type, path, n)) => {
                logf!("Saved {data_type} to {} ({n} bytes)", path.display());
                if let Some(p) = progress.as_deref_mut() {
                    p.item_done(&data_type);
                }
                written.push(path);
            }
            Err((data_type, e)) => {
                loge!("Download of {data_type} failed: {e}");
                if let Some(p) = progress.as_deref_mut() {
                    p.item_failed(&data_type);
                }
                first_err.get_or_insert(e);
            }
        }
    }

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    if let Some(e) = first_err {
        return Err(e);
    }
    written.sort();
    Ok(written)
}

/// Fetch the species reference feed, check it still has the expected shape,
/// and save it verbatim to `dest`. Returns the number of species in the feed.
pub fn download_species_reference<F: Fetch + ?Sized>(fetcher: &F, url: &str, dest: &Path) -> Result<usize> {
    let body = fetcher.get_text(url)?;
    let species: Vec<ReferenceSpecies> = serde_json::from_str(&body)
        .map_err(|e| Error::Schema(format!("species reference from {url}: {e}")))?;
    file::write_bytes(dest, body.as_bytes())?;
    logf!("Saved {} reference species to {}", species.len(), dest.display());
    Ok(species.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{collections::HashMap, fs};

    struct Canned(HashMap<String, String>);

    impl Fetch for Canned {
        fn get_text(&self, url: &str) -> Result<String> {
            self.0.get(url).cloned().ok_or_else(|| Error::Status { url: s!(url), status: 404 })
        }
    }

    fn opts() -> DownloadOptions {
        DownloadOptions {
            data_types: vec![s!("m1"), s!("m2_inverts")],
            url_prefix: s!("https://wfs.test/"),
            url_suffix: s!(".csv"),
            workers: 2,
            reference_url: None,
        }
    }

    #[test]
    fn survey_files_are_named_after_their_type() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("survey");
        let fetcher = Arc::new(Canned(HashMap::from([
            (s!("https://wfs.test/m1.csv"), s!("a,b\n1,2\n")),
            (s!("https://wfs.test/m2_inverts.csv"), s!("a,b\n3,4\n")),
        ])));

        let written = download_survey_data(fetcher, &opts(), &dest, None).unwrap();
        assert_eq!(written, vec![dest.join("m1.csv"), dest.join("m2_inverts.csv")]);
        assert_eq!(fs::read_to_string(dest.join("m2_inverts.csv")).unwrap(), "a,b\n3,4\n");
    }

    #[test]
    fn one_failed_type_fails_the_download() {
        let tmp = tempfile::tempdir().unwrap();
        let fetcher = Arc::new(Canned(HashMap::from([(s!("https://wfs.test/m1.csv"), s!("x\n"))])));
        let err = download_survey_data(fetcher, &opts(), tmp.path(), None).unwrap_err();
        assert!(matches!(err, Error::Status { status: 404, .. }));
    }

    #[test]
    fn survey_dest_must_be_empty() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("old.csv"), "").unwrap();
        let fetcher = Arc::new(Canned(HashMap::new()));
        let err = download_survey_data(fetcher, &opts(), tmp.path(), None).unwrap_err();
        assert!(matches!(err, Error::NotEmpty(_)));
    }

    #[test]
    fn reference_with_wrong_shape_is_not_saved() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("reference.json");
        let fetcher = Canned(HashMap::from([(s!("https://api.test/species"), s!(r#"{"data": []}"#))]));

        let err = download_species_reference(&fetcher, "https://api.test/species", &dest).unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
        assert!(!dest.exists());
    }

    #[test]
    fn reference_is_saved_verbatim() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("reference.json");
        let body = r#"[{"slug": "a-b", "scientific_name": "A b", "extra": 1}]"#;
        let fetcher = Canned(HashMap::from([(s!("https://api.test/species"), s!(body))]));

        assert_eq!(download_species_reference(&fetcher, "https://api.test/species", &dest).unwrap(), 1);
        assert_eq!(fs::read_to_string(&dest).unwrap(), body);
    }
}
