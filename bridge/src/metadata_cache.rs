//! The metadata cache (`spec.md` §3 "CacheEntry", §6 "Cache file"): records each bundle's
//! plugin descriptors so a host can enumerate plugins without instantiating the sandbox module
//! every time. Persisted as `plugin-cache.txt`, the line-oriented text format `spec.md` §6 spells
//! out literally: a `WCLAP_CACHE_V1` header, one `PATH:`/`MTIME:` record per bundle with one or
//! more `BEGIN_PLUGIN`…`END_PLUGIN` groups inside it, terminated by `END_WCLAP`. Field order
//! within a group doesn't matter to the reader, but the writer emits it in the order `spec.md`
//! lists the fields so a diff against a real host's cache file stays readable.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use wclap_marshal::PluginDescriptor;

const HEADER: &str = "WCLAP_CACHE_V1";

/// One bundle's cached descriptors, keyed to the module file's mtime at the time it was recorded.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub bundle_path: PathBuf,
    pub module_mtime: u64,
    pub descriptors: Vec<PluginDescriptor>,
}

/// The in-memory metadata cache, loaded from and flushed back to a single text file.
#[derive(Default)]
pub struct MetadataCache {
    entries: HashMap<PathBuf, CacheEntry>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `plugin-cache.txt`. A missing header, or any record this reader doesn't
    /// understand, just means that one bundle gets re-scanned rather than failing the whole
    /// load — a corrupt or partially-written record shouldn't take every other bundle's cache
    /// entry down with it.
    pub fn load(path: &Path) -> io::Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e),
        };
        let mut cache = Self::default();
        let mut lines = text.lines().peekable();
        if lines.peek() != Some(&HEADER) {
            return Ok(cache);
        }
        lines.next();
        while let Some(line) = lines.next() {
            let Some(bundle_path) = line.strip_prefix("PATH:") else { continue };
            let mut mtime = 0u64;
            let mut descriptors = Vec::new();
            for record in lines.by_ref() {
                if record == "END_WCLAP" {
                    break;
                }
                if record == "BEGIN_PLUGIN" {
                    descriptors.push(read_plugin_group(&mut lines));
                } else if let Some(value) = record.strip_prefix("MTIME:") {
                    mtime = value.parse().unwrap_or(0);
                }
            }
            cache.entries.insert(
                PathBuf::from(bundle_path),
                CacheEntry { bundle_path: PathBuf::from(bundle_path), module_mtime: mtime, descriptors },
            );
        }
        Ok(cache)
    }

    /// Serializes every entry back to `path` in `spec.md` §6's literal format.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let mut out = String::new();
        writeln!(out, "{HEADER}").ok();
        for entry in self.entries.values() {
            writeln!(out, "PATH:{}", entry.bundle_path.display()).ok();
            writeln!(out, "MTIME:{}", entry.module_mtime).ok();
            for d in &entry.descriptors {
                writeln!(out, "BEGIN_PLUGIN").ok();
                writeln!(out, "ID:{}", d.id).ok();
                writeln!(out, "NAME:{}", d.name).ok();
                writeln!(out, "VENDOR:{}", d.vendor).ok();
                writeln!(out, "URL:{}", d.url).ok();
                writeln!(out, "MANUAL_URL:{}", d.manual_url).ok();
                writeln!(out, "SUPPORT_URL:{}", d.support_url).ok();
                writeln!(out, "VERSION:{}", d.version).ok();
                writeln!(out, "DESCRIPTION:{}", d.description).ok();
                for feature in &d.features {
                    writeln!(out, "FEATURE:{feature}").ok();
                }
                writeln!(out, "END_PLUGIN").ok();
            }
            writeln!(out, "END_WCLAP").ok();
        }
        fs::write(path, out)
    }

    /// Returns the cached descriptors for `bundle_path` if present and still valid against the
    /// module file's current mtime (seconds granularity, per `spec.md` §3).
    pub fn lookup(&self, bundle_path: &Path, module_path: &Path) -> Option<&[PluginDescriptor]> {
        let entry = self.entries.get(bundle_path)?;
        let current_mtime = mtime_secs(module_path).ok()?;
        (entry.module_mtime == current_mtime).then_some(entry.descriptors.as_slice())
    }

    /// Records freshly enumerated descriptors for a bundle, replacing any stale entry.
    pub fn record(&mut self, bundle_path: PathBuf, module_path: &Path, descriptors: Vec<PluginDescriptor>) {
        let module_mtime = mtime_secs(module_path).unwrap_or(0);
        self.entries.insert(bundle_path.clone(), CacheEntry { bundle_path, module_mtime, descriptors });
    }
}

fn read_plugin_group<'a>(lines: &mut std::iter::Peekable<impl Iterator<Item = &'a str>>) -> PluginDescriptor {
    let mut d = PluginDescriptor {
        id: String::new(),
        name: String::new(),
        vendor: String::new(),
        url: String::new(),
        manual_url: String::new(),
        support_url: String::new(),
        version: String::new(),
        description: String::new(),
        features: Vec::new(),
    };
    for record in lines.by_ref() {
        if record == "END_PLUGIN" {
            break;
        }
        let Some((key, value)) = record.split_once(':') else { continue };
        match key {
            "ID" => d.id = value.to_string(),
            "NAME" => d.name = value.to_string(),
            "VENDOR" => d.vendor = value.to_string(),
            "URL" => d.url = value.to_string(),
            "MANUAL_URL" => d.manual_url = value.to_string(),
            "SUPPORT_URL" => d.support_url = value.to_string(),
            "VERSION" => d.version = value.to_string(),
            "DESCRIPTION" => d.description = value.to_string(),
            "FEATURE" => d.features.push(value.to_string()),
            _ => {}
        }
    }
    d
}

fn mtime_secs(path: &Path) -> io::Result<u64> {
    let modified = fs::metadata(path)?.modified()?;
    Ok(modified.duration_since(SystemTime::UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(id: &str) -> PluginDescriptor {
        PluginDescriptor {
            id: id.to_string(),
            name: "Test Synth".to_string(),
            vendor: "Test".to_string(),
            url: "https://example.test".to_string(),
            manual_url: String::new(),
            support_url: String::new(),
            version: "1.0".to_string(),
            description: "a test synth".to_string(),
            features: vec!["instrument".to_string(), "stereo".to_string()],
        }
    }

    #[test]
    fn round_trips_through_disk() {
        let dir = std::env::temp_dir().join(format!("wclap-cache-test-{:?}", std::thread::current().id()));
        fs::create_dir_all(&dir).unwrap();
        let cache_path = dir.join("cache.txt");
        let module_path = dir.join("bundle.wasm");
        fs::write(&module_path, b"fake").unwrap();

        let mut cache = MetadataCache::new();
        cache.record(dir.join("bundle.wasm"), &module_path, vec![descriptor("com.example.synth")]);
        cache.save(&cache_path).unwrap();

        let text = fs::read_to_string(&cache_path).unwrap();
        assert!(text.starts_with("WCLAP_CACHE_V1\n"));
        assert!(text.contains("BEGIN_PLUGIN\n"));
        assert!(text.contains("FEATURE:instrument\n"));
        assert!(text.trim_end().ends_with("END_WCLAP"));

        let loaded = MetadataCache::load(&cache_path).unwrap();
        let descriptors = loaded.lookup(&dir.join("bundle.wasm"), &module_path).unwrap();
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].id, "com.example.synth");
        assert_eq!(descriptors[0].url, "https://example.test");
        assert_eq!(descriptors[0].features, vec!["instrument", "stereo"]);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn multiple_plugins_per_bundle_round_trip() {
        let dir = std::env::temp_dir().join(format!("wclap-cache-test-multi-{:?}", std::thread::current().id()));
        fs::create_dir_all(&dir).unwrap();
        let cache_path = dir.join("cache.txt");
        let module_path = dir.join("bundle.wasm");
        fs::write(&module_path, b"fake").unwrap();

        let mut cache = MetadataCache::new();
        cache.record(
            dir.join("bundle.wasm"),
            &module_path,
            vec![descriptor("com.example.synth"), descriptor("com.example.fx")],
        );
        cache.save(&cache_path).unwrap();

        let loaded = MetadataCache::load(&cache_path).unwrap();
        let descriptors = loaded.lookup(&dir.join("bundle.wasm"), &module_path).unwrap();
        assert_eq!(descriptors.len(), 2);
        assert_eq!(descriptors[1].id, "com.example.fx");

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_header_yields_empty_cache() {
        let dir = std::env::temp_dir().join(format!("wclap-cache-test-header-{:?}", std::thread::current().id()));
        fs::create_dir_all(&dir).unwrap();
        let cache_path = dir.join("cache.txt");
        fs::write(&cache_path, "PATH:/nonexistent\nMTIME:1\nEND_WCLAP\n").unwrap();

        let loaded = MetadataCache::load(&cache_path).unwrap();
        assert!(loaded.lookup(Path::new("/nonexistent"), Path::new("/nonexistent")).is_none());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn stale_mtime_misses() {
        let dir = std::env::temp_dir().join(format!("wclap-cache-test-stale-{:?}", std::thread::current().id()));
        fs::create_dir_all(&dir).unwrap();
        let module_path = dir.join("bundle.wasm");
        fs::write(&module_path, b"fake").unwrap();

        let mut cache = MetadataCache::new();
        cache.record(dir.join("bundle.wasm"), &module_path, vec![descriptor("com.example.synth")]);

        // Simulate the module file changing after the cache entry was recorded.
        std::thread::sleep(std::time::Duration::from_millis(1100));
        fs::write(&module_path, b"fake-changed").unwrap();

        assert!(cache.lookup(&dir.join("bundle.wasm"), &module_path).is_none());
        fs::remove_dir_all(&dir).ok();
    }
}
