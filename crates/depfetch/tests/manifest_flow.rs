//! End-to-end flow: parse a manifest document, then fetch, verify and
//! materialize its entries against a loopback HTTP server.

use depfetch::{Cache, Manifest, Processor, RunOptions};
use tempfile::TempDir;

const MD5_ABC: &str = "900150983cd24fb0d6963f7d28e17f72";

fn serve(body: Vec<u8>) -> String {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let port = server.server_addr().to_ip().unwrap().port();
    std::thread::spawn(move || {
        for request in server.incoming_requests() {
            let _ = request.respond(tiny_http::Response::from_data(body.clone()));
        }
    });
    format!("http://127.0.0.1:{port}")
}

#[tokio::test]
async fn file_entry_download_verify_and_rerun_from_cache() {
    let base = serve(b"abc".to_vec());
    let dir = TempDir::new().unwrap();
    let cache_root = dir.path().join("cache");
    let dest = dir.path().join("out/a.txt");

    let manifest = Manifest::parse(&format!(
        r#"<DependencyList>
            <File Source="{base}/a.txt" Destination="{dest}" Md5="{MD5_ABC}"/>
        </DependencyList>"#,
        dest = dest.display()
    ))
    .unwrap();

    let processor = Processor::with_cache(None, Cache::at(&cache_root)).unwrap();
    processor
        .run(&manifest, &RunOptions::default())
        .await
        .unwrap();

    assert_eq!(std::fs::read(&dest).unwrap(), b"abc");
    assert_eq!(std::fs::read(cache_root.join("a.txt")).unwrap(), b"abc");

    // delete the destination but keep the cache: the rerun must restore it
    // without another fetch. Swap in an entry pointing at a dead port to
    // prove the network is not touched.
    std::fs::remove_file(&dest).unwrap();
    let rerun = Manifest::parse(&format!(
        r#"<DependencyList>
            <File Source="http://127.0.0.1:9/a.txt" Destination="{dest}" Md5="{MD5_ABC}"/>
        </DependencyList>"#,
        dest = dest.display()
    ))
    .unwrap();

    processor.run(&rerun, &RunOptions::default()).await.unwrap();
    assert_eq!(std::fs::read(&dest).unwrap(), b"abc");
}

#[tokio::test]
async fn clean_mode_removes_destinations_and_nothing_else() {
    let dir = TempDir::new().unwrap();
    let cache_root = dir.path().join("cache");
    std::fs::create_dir_all(&cache_root).unwrap();
    std::fs::write(cache_root.join("x.zip"), b"keep me").unwrap();

    let dest = dir.path().join("out/x");
    std::fs::create_dir_all(dest.join("sub")).unwrap();
    std::fs::write(dest.join("sub/b.txt"), b"world").unwrap();

    let manifest = Manifest::parse(&format!(
        r#"<DependencyList>
            <Zip Source="http://127.0.0.1:9/x.zip" Destination="{dest}"/>
        </DependencyList>"#,
        dest = dest.display()
    ))
    .unwrap();

    let processor = Processor::with_cache(None, Cache::at(&cache_root)).unwrap();
    let options = RunOptions {
        clean: true,
        ..Default::default()
    };

    processor.run(&manifest, &options).await.unwrap();
    assert!(!dest.exists());
    // the cache is untouched by clean mode
    assert!(cache_root.join("x.zip").exists());

    // clean is idempotent
    processor.run(&manifest, &options).await.unwrap();
}
