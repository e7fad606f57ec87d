use std::io::Write;
use web_server::load_settings;

#[test]
fn env_file_overrides_reach_the_configuration() {
    let dir = tempfile::tempdir().unwrap();

    let defaults = load_settings(&dir.path().join(".env")).unwrap();
    assert_eq!(defaults.server.port, 3000);

    let path = dir.path().join(".env");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "DATALENS__SERVER__PORT=4321\nDATALENS__ANALYSIS__TOP_N=7").unwrap();
    drop(file);

    let config = load_settings(&path).unwrap();
    assert_eq!(config.server.port, 4321);
    assert_eq!(config.analysis.top_n, 7);
}
