#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use rov::{Rov, RoaValidity};
    use tempfile::TempDir;

    const EXPORT_JSON: &str = r#"{
        "roas": [
            {"asn": 64000, "prefix": "10.0.0.0/8", "maxLength": 16, "ta": "ripencc"},
            {"asn": "AS64001", "prefix": "192.0.2.0/24", "maxLength": 24, "ta": "arin"},
            {"asn": 64002, "prefix": "2001:db8::/32", "maxLength": 48, "ta": "apnic"},
            {"asn": 64000, "prefix": "broken", "maxLength": 16, "ta": "ripencc"}
        ]
    }"#;

    const RIPENCC_CSV: &str = "\
URI,ASN,IP Prefix,Max Length,Not Before,Not After
rsync://rpki.ripe.net/repo/a.roa,AS64010,10.0.0.0/8,24,2019-01-01 04:00:00,2020-07-01 04:00:00
rsync://rpki.ripe.net/repo/b.roa,AS64011,192.0.2.0/24,,2019-01-01 04:00:00,2020-07-01 04:00:00
this row is not an archive row
";

    fn setup_test_dir() -> (TempDir, PathBuf) {
        let _ = env_logger::builder().is_test(true).try_init();
        let temp_dir = TempDir::new().unwrap();
        let temp_path = temp_dir.path().to_path_buf();
        (temp_dir, temp_path)
    }

    fn write_file(dir: &PathBuf, name: &str, content: &str) -> String {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn test_load_json_feed_and_check() {
        let (_guard, dir) = setup_test_dir();
        let feed = write_file(&dir, "export.json", EXPORT_JSON);

        let mut rov = Rov::new();
        let stats = rov.load("rpki", &[feed]).unwrap();
        assert_eq!(stats.inserted, 3);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.failed_sources, 0);

        assert_eq!(
            rov.check("10.0.0.0/16", 64000).unwrap().status,
            RoaValidity::Valid
        );
        assert_eq!(
            rov.check("10.0.0.0/24", 64000).unwrap().status,
            RoaValidity::InvalidMoreSpecific
        );
        assert_eq!(
            rov.check("10.0.0.0/16", 64100).unwrap().status,
            RoaValidity::Invalid
        );
        assert_eq!(
            rov.check("203.0.113.0/24", 64000).unwrap().status,
            RoaValidity::NotFound
        );
        assert_eq!(
            rov.check("2001:db8:beef::/48", 64002).unwrap().status,
            RoaValidity::Valid
        );
    }

    #[test]
    fn test_load_csv_archive_infers_trust_anchor() {
        let (_guard, dir) = setup_test_dir();
        let archive = write_file(&dir, "ripencc.csv", RIPENCC_CSV);

        let mut rov = Rov::new();
        let stats = rov.load("archive", &[archive]).unwrap();
        assert_eq!(stats.inserted, 2);
        // the free-text row is skipped, the rows around it still load
        assert_eq!(stats.skipped, 1);

        let verdict = rov.check_source("archive", "10.0.0.0/20", 64010).unwrap();
        assert_eq!(verdict.status, RoaValidity::Valid);
        let roa = verdict.roa.unwrap();
        assert_eq!(roa.trust_anchor.as_str(), "ripencc");
        assert!(roa.valid_from.is_some());
        assert!(roa.valid_until.is_some());
    }

    #[test]
    fn test_reload_replaces_instead_of_appending() {
        let (_guard, dir) = setup_test_dir();
        let feed = write_file(&dir, "export.json", EXPORT_JSON);

        let mut rov = Rov::new();
        rov.load("rpki", &[feed.clone()]).unwrap();
        let first = rov.trie("rpki").unwrap().record_count();
        let verdict_one = rov.check("10.0.0.0/16", 64000).unwrap();

        rov.load("rpki", &[feed]).unwrap();
        assert_eq!(rov.trie("rpki").unwrap().record_count(), first);
        let verdict_two = rov.check("10.0.0.0/16", 64000).unwrap();
        assert_eq!(
            serde_json::to_value(&verdict_one).unwrap(),
            serde_json::to_value(&verdict_two).unwrap()
        );
    }

    #[test]
    fn test_multiple_files_build_one_source() {
        let (_guard, dir) = setup_test_dir();
        let feed = write_file(&dir, "export.json", EXPORT_JSON);
        let archive = write_file(&dir, "ripencc.csv", RIPENCC_CSV);

        let mut rov = Rov::new();
        let stats = rov.load("rpki", &[feed, archive]).unwrap();
        assert_eq!(stats.inserted, 5);

        // records from both files land in the same trie
        assert_eq!(
            rov.check("192.0.2.0/24", 64001).unwrap().status,
            RoaValidity::Valid
        );
        assert_eq!(
            rov.check("192.0.2.0/24", 64011).unwrap().status,
            RoaValidity::Valid
        );
    }

    #[test]
    fn test_unrecognized_format_fails_that_file_only() {
        let (_guard, dir) = setup_test_dir();
        let feed = write_file(&dir, "export.json", EXPORT_JSON);
        let stray = write_file(&dir, "notes.txt", "not a roa payload");

        let mut rov = Rov::new();
        let stats = rov.load("rpki", &[stray, feed]).unwrap();
        assert_eq!(stats.failed_sources, 1);
        assert_eq!(stats.inserted, 3);
        assert_eq!(
            rov.check("10.0.0.0/16", 64000).unwrap().status,
            RoaValidity::Valid
        );
    }

    #[test]
    fn test_query_all_tags_verdicts_by_source() {
        let (_guard, dir) = setup_test_dir();
        let feed = write_file(&dir, "export.json", EXPORT_JSON);
        let archive = write_file(&dir, "ripencc.csv", RIPENCC_CSV);

        let mut rov = Rov::new();
        rov.load("rpki", &[feed]).unwrap();
        rov.load("archive-2019-01-01", &[archive]).unwrap();

        // live feed: maxLength 16 -> more specific; archive: maxLength 24
        // but only for AS64010
        let verdicts = rov.query_all("10.0.0.0/24", 64000).unwrap();
        assert_eq!(verdicts.len(), 2);
        assert_eq!(
            verdicts["rpki"].status,
            RoaValidity::InvalidMoreSpecific
        );
        assert_eq!(
            verdicts["archive-2019-01-01"].status,
            RoaValidity::Invalid
        );
    }

    #[test]
    fn test_verdict_wire_shape() {
        let (_guard, dir) = setup_test_dir();
        let feed = write_file(&dir, "export.json", EXPORT_JSON);

        let mut rov = Rov::new();
        rov.load("rpki", &[feed]).unwrap();

        let value = serde_json::to_value(rov.check("10.0.0.0/16", 64000).unwrap()).unwrap();
        assert_eq!(value["status"], "Valid");
        assert_eq!(value["status_code"], 1);
        assert_eq!(value["matched_prefix"], "10.0.0.0/8");
        assert_eq!(value["trust_anchor"], "ripencc");
        assert_eq!(value["max_length"], 16);
    }

    #[test]
    fn test_reserved_asn_before_any_lookup() {
        let (_guard, dir) = setup_test_dir();
        let feed = write_file(&dir, "export.json", EXPORT_JSON);

        let mut rov = Rov::new();
        rov.load("rpki", &[feed]).unwrap();
        let verdict = rov.check("10.0.0.0/16", 65000).unwrap();
        assert_eq!(verdict.status, RoaValidity::ReservedAsn);
        assert!(verdict.matched_prefix.is_none());
    }

    #[test]
    fn test_concurrent_queries_on_one_snapshot() {
        let (_guard, dir) = setup_test_dir();
        let feed = write_file(&dir, "export.json", EXPORT_JSON);

        let mut rov = Rov::new();
        rov.load("rpki", &[feed]).unwrap();
        let trie = rov.trie("rpki").unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let trie = trie.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        let verdict = rov::validate(
                            &trie,
                            &"10.0.0.0/16".parse().unwrap(),
                            rov::Asn::new(64000),
                        );
                        assert_eq!(verdict.status, RoaValidity::Valid);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
