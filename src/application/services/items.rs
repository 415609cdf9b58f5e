//! Item list service
//!
//! Loads item lists from files and runs the tree conversions on them
//! with the configured orphan policy.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{
    audit, build_flat_list, get_children, get_groups, get_item_by_id, parse_items, render, Item,
    ItemTreeBuilder, TreeReport,
};
use crate::infrastructure::traits::FileSystem;

/// Service for file-backed item list operations.
pub struct ItemService {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
}

impl ItemService {
    /// Create a new item service.
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        Self { fs, settings }
    }

    fn builder(&self) -> ItemTreeBuilder {
        ItemTreeBuilder::new(self.settings.orphans)
    }

    /// Read and parse an item list (flat or tree form).
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<Vec<Item>> {
        if !self.fs.exists(path) {
            return Err(ApplicationError::FileNotFound(path.to_path_buf()));
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read items", path)?;
        let items = parse_items(&content).map_err(|e| ApplicationError::Parse {
            path: path.to_path_buf(),
            message: e.message,
        })?;
        debug!("load: {} items from {}", items.len(), path.display());
        Ok(items)
    }

    /// Build the group tree of a flat list.
    #[instrument(level = "debug", skip(self))]
    pub fn tree(&self, path: &Path) -> ApplicationResult<Vec<Item>> {
        self.build(&self.load(path)?)
    }

    /// Build the group tree of already loaded items.
    pub fn build(&self, items: &[Item]) -> ApplicationResult<Vec<Item>> {
        Ok(self.builder().build(items)?)
    }

    /// Flatten a tree document.
    #[instrument(level = "debug", skip(self))]
    pub fn flatten(&self, path: &Path) -> ApplicationResult<Vec<Item>> {
        let tree = self.load(path)?;
        Ok(build_flat_list(&tree, None))
    }

    pub fn groups(&self, path: &Path) -> ApplicationResult<Vec<Item>> {
        Ok(get_groups(&self.load(path)?))
    }

    pub fn item(&self, path: &Path, id: i64) -> ApplicationResult<Item> {
        let items = self.load(path)?;
        get_item_by_id(&items, Some(id))
            .cloned()
            .ok_or(ApplicationError::ItemNotFound(id))
    }

    /// Children of an existing group, sorted by weight.
    pub fn children(&self, path: &Path, group_id: i64) -> ApplicationResult<Vec<Item>> {
        let items = self.load(path)?;
        if get_item_by_id(&get_groups(&items), Some(group_id)).is_none() {
            return Err(ApplicationError::ItemNotFound(group_id));
        }
        Ok(get_children(&items, group_id))
    }

    #[instrument(level = "debug", skip(self))]
    pub fn check(&self, path: &Path) -> ApplicationResult<TreeReport> {
        Ok(audit(&self.load(path)?))
    }

    /// Tree of a flat list as indented text.
    pub fn render(&self, path: &Path) -> ApplicationResult<String> {
        Ok(render(&self.tree(path)?).to_string())
    }

    /// Serialize items according to the `pretty` setting.
    pub fn to_json<T: Serialize + ?Sized>(&self, value: &T) -> ApplicationResult<String> {
        let json = if self.settings.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        json.map_err(|e| ApplicationError::OperationFailed {
            context: "serialize items".to_string(),
            source: Box::new(e),
        })
    }

    pub fn write(&self, path: &Path, content: &str) -> ApplicationResult<()> {
        self.fs
            .ensure_parent(path)
            .with_path_context("create parent directory", path)?;
        self.fs
            .write(path, content)
            .with_path_context("write items", path)?;
        debug!("write: {} bytes to {}", content.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use crate::domain::{DomainError, OrphanPolicy};

    #[derive(Default)]
    struct MemoryFileSystem {
        files: Mutex<HashMap<PathBuf, String>>,
        reads: AtomicUsize,
    }

    impl MemoryFileSystem {
        fn with_file(path: &str, content: &str) -> Self {
            let fs = Self::default();
            fs.files
                .lock()
                .unwrap()
                .insert(PathBuf::from(path), content.to_string());
            fs
        }
    }

    impl FileSystem for MemoryFileSystem {
        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.files
                .lock()
                .unwrap()
                .get(path)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "missing"))
        }

        fn write(&self, path: &Path, content: &str) -> io::Result<()> {
            self.files
                .lock()
                .unwrap()
                .insert(path.to_path_buf(), content.to_string());
            Ok(())
        }

        fn exists(&self, path: &Path) -> bool {
            self.files.lock().unwrap().contains_key(path)
        }

        fn ensure_parent(&self, _path: &Path) -> io::Result<()> {
            Ok(())
        }
    }

    const ITEMS: &str = r#"[
        {"id": 1, "item_type": "item_group", "pid": null, "weight": 0},
        {"id": 2, "item_type": "link", "pid": 1, "weight": 1},
        {"id": 3, "item_type": "link", "pid": 1, "weight": 0},
        {"id": 4, "item_type": "link", "pid": 9, "weight": 0}
    ]"#;

    fn service(orphans: OrphanPolicy) -> (ItemService, Arc<MemoryFileSystem>) {
        let fs = Arc::new(MemoryFileSystem::with_file("items.json", ITEMS));
        let settings = Settings {
            orphans,
            pretty: false,
        };
        (ItemService::new(fs.clone(), Arc::new(settings)), fs)
    }

    #[test]
    fn given_drop_policy_when_building_tree_then_orphan_is_gone() {
        let (service, _) = service(OrphanPolicy::Drop);

        let tree = service.tree(Path::new("items.json")).unwrap();

        assert_eq!(tree.len(), 1);
        let children: Vec<i64> = tree[0].children.iter().map(|c| c.id).collect();
        assert_eq!(children, vec![3, 2]);
    }

    #[test]
    fn given_reject_policy_when_building_tree_then_reports_orphan() {
        let (service, _) = service(OrphanPolicy::Reject);

        let err = service.tree(Path::new("items.json")).unwrap_err();

        assert!(matches!(
            err,
            ApplicationError::Domain(DomainError::OrphanedChild { id: 4, pid: Some(9) })
        ));
    }

    #[test]
    fn given_loaded_items_when_auditing_and_building_then_reads_file_once() {
        let (service, fs) = service(OrphanPolicy::Drop);

        let items = service.load(Path::new("items.json")).unwrap();
        let report = audit(&items);
        let tree = service.build(&items).unwrap();

        assert_eq!(fs.reads.load(Ordering::SeqCst), 1);
        assert_eq!(report.orphans, vec![4]);
        assert_eq!(tree, service.tree(Path::new("items.json")).unwrap());
    }

    #[test]
    fn given_missing_file_when_loading_then_fails_with_context() {
        let (service, _) = service(OrphanPolicy::Drop);

        let err = service.load(Path::new("nope.json")).unwrap_err();

        assert!(matches!(
            err,
            ApplicationError::FileNotFound(ref p) if p == Path::new("nope.json")
        ));
        assert_eq!(err.to_string(), "file not found: nope.json");
    }

    #[test]
    fn given_unknown_group_when_listing_children_then_not_found() {
        let (service, _) = service(OrphanPolicy::Drop);

        let err = service.children(Path::new("items.json"), 2).unwrap_err();

        assert!(matches!(err, ApplicationError::ItemNotFound(2)));
    }

    #[test]
    fn given_compact_setting_when_writing_json_then_single_line() {
        let (service, fs) = service(OrphanPolicy::Drop);
        let groups = service.groups(Path::new("items.json")).unwrap();

        let json = service.to_json(&groups).unwrap();
        service.write(Path::new("out.json"), &json).unwrap();

        let written = fs.read_to_string(Path::new("out.json")).unwrap();
        assert_eq!(
            written,
            r#"[{"id":1,"item_type":"item_group","pid":null,"weight":0,"config":null}]"#
        );
    }
}
