//! `Kernellab`: the subsystem that wires devices, counters and attributes.
//!
//! ```text
//! Kernellab
//!   ├── CounterStore (Arc, shared)
//!   ├── DeviceInstance[minor 1]  ──┐
//!   ├── DeviceInstance[minor 2]  ──┼── ProcessTable (Arc, minor 2 only)
//!   ├── CountAttributes          ──┘
//!   └── NodeRegistry: <prefix>1, <prefix>2, <attr_dir>
//! ```
//!
//! Start-up is all-or-nothing: if any node cannot be created, every node
//! created so far is destroyed, newest first, before the error is
//! returned.

use std::sync::Arc;

use kernellab_core::counters::{CounterStore, Counts};
use kernellab_core::error::{DeviceResult, ModuleError, ModuleResult};
use kernellab_core::kprint::{self, LogLevel};
use kernellab_core::minor::{DeviceMinor, NR_DEVS};
use kernellab_core::session::Session;
use kernellab_core::traits::{NodeKind, NodeRegistry, ProcessTable};
use kernellab_core::{kdebug, kerror, kinfo};

use crate::config::ModuleConfig;
use crate::device::{DeviceInstance, OpenFile};
use crate::process_table::new_process_table;
use crate::registry::NodeTable;
use crate::sysfs::CountAttributes;

/// The loaded subsystem. Dropping it unloads it.
pub struct Kernellab {
    config: ModuleConfig,
    store: Arc<CounterStore>,
    /// Indexed by `DeviceMinor::index()`
    devices: Vec<Arc<DeviceInstance>>,
    attributes: CountAttributes,
    registry: Arc<dyn NodeRegistry>,
    /// Published names in creation order
    nodes: Vec<String>,
}

impl Kernellab {
    pub fn builder() -> KernellabBuilder {
        KernellabBuilder::new()
    }

    /// Device for `minor`
    pub fn device(&self, minor: DeviceMinor) -> &Arc<DeviceInstance> {
        &self.devices[minor.index()]
    }

    /// Open device `minor` for `session`
    pub fn open(&self, minor: DeviceMinor, session: Session) -> DeviceResult<OpenFile> {
        self.device(minor).open(session)
    }

    /// The read-only attribute group
    pub fn attributes(&self) -> &CountAttributes {
        &self.attributes
    }

    /// Side-effect-free snapshot of the counters
    pub fn counts(&self) -> Counts {
        self.store.snapshot()
    }

    pub fn config(&self) -> &ModuleConfig {
        &self.config
    }

    /// Names published in the registry, in creation order
    pub fn node_names(&self) -> &[String] {
        &self.nodes
    }
}

impl Drop for Kernellab {
    fn drop(&mut self) {
        unwind(&*self.registry, &self.nodes);
        kinfo!("kernellab: module UNLOADED");
    }
}

/// Destroy `nodes` newest first
fn unwind(registry: &dyn NodeRegistry, nodes: &[String]) {
    for name in nodes.iter().rev() {
        kdebug!("kernellab: destroying {}", name);
        registry.destroy(name);
    }
}

/// Builder for a [`Kernellab`]
///
/// Unset collaborators get defaults: the platform process table and an
/// in-memory [`NodeTable`].
pub struct KernellabBuilder {
    config: ModuleConfig,
    table: Option<Arc<dyn ProcessTable>>,
    registry: Option<Arc<dyn NodeRegistry>>,
}

impl Default for KernellabBuilder {
    fn default() -> Self {
        Self {
            config: ModuleConfig::from_env(),
            table: None,
            registry: None,
        }
    }
}

impl KernellabBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: ModuleConfig) -> Self {
        self.config = config;
        self
    }

    pub fn process_table(mut self, table: Arc<dyn ProcessTable>) -> Self {
        self.table = Some(table);
        self
    }

    pub fn registry(mut self, registry: Arc<dyn NodeRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Bring the subsystem up
    ///
    /// 1. Validates the config
    /// 2. Publishes `<prefix>1`, `<prefix>2`
    /// 3. Builds the device arena around one zeroed Counter Store
    /// 4. Publishes the attribute directory
    pub fn build(self) -> ModuleResult<Kernellab> {
        let config = self.config;
        config.validate()?;
        if config.debug_logging {
            kprint::set_log_level(LogLevel::Debug);
        }

        let table = self.table.unwrap_or_else(|| Arc::from(new_process_table()));
        let registry = self.registry.unwrap_or_else(|| Arc::new(NodeTable::new()));
        let mut nodes = Vec::with_capacity(NR_DEVS + 1);

        for minor in DeviceMinor::ALL {
            let name = minor.node_name(&config.device_prefix);
            publish(&*registry, &mut nodes, NodeKind::CharDevice(minor), name)?;
        }

        let store = Arc::new(CounterStore::new());
        let devices = DeviceMinor::ALL
            .into_iter()
            .map(|minor| {
                Arc::new(DeviceInstance::new(
                    minor,
                    Arc::clone(&store),
                    Arc::clone(&table),
                    config.interrupt_poll,
                ))
            })
            .collect();

        publish(&*registry, &mut nodes, NodeKind::AttributeGroup, config.attr_dir.clone())?;

        kinfo!("kernellab: module INJECTED (class {})", config.class_name);

        Ok(Kernellab {
            attributes: CountAttributes::new(Arc::clone(&store)),
            config,
            store,
            devices,
            registry,
            nodes,
        })
    }
}

/// Create one node, unwinding everything in `nodes` on failure
fn publish(
    registry: &dyn NodeRegistry,
    nodes: &mut Vec<String>,
    kind: NodeKind,
    name: String,
) -> ModuleResult<()> {
    if let Err(errno) = registry.create(kind, &name) {
        kerror!("kernellab: cannot create {}: errno {}", name, errno);
        unwind(registry, nodes);
        nodes.clear();
        return Err(ModuleError::Registration { name, errno });
    }
    nodes.push(name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address_space::AddressSpace;
    use crate::process_table::StaticProcessTable;
    use crate::sysfs::CountAttribute;

    fn build_with(registry: Arc<NodeTable>) -> ModuleResult<Kernellab> {
        Kernellab::builder()
            .config(ModuleConfig::new())
            .process_table(Arc::new(StaticProcessTable::new()))
            .registry(registry)
            .build()
    }

    #[test]
    fn test_start_publishes_nodes() {
        let registry = Arc::new(NodeTable::new());
        let klab = build_with(registry.clone()).unwrap();

        assert_eq!(klab.node_names(), ["kernellab1", "kernellab2", "kernellab"]);
        assert_eq!(registry.kind("kernellab2"), Some(NodeKind::CharDevice(DeviceMinor::PID)));
        assert_eq!(registry.kind("kernellab"), Some(NodeKind::AttributeGroup));
        assert_eq!(klab.device(DeviceMinor::CURRENT).minor(), DeviceMinor::CURRENT);
        assert_eq!(klab.device(DeviceMinor::PID).minor(), DeviceMinor::PID);
        assert_eq!(klab.counts(), Counts::default());

        drop(klab);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_failed_device_node_unwinds() {
        let registry = Arc::new(NodeTable::with_capacity(1));
        let err = build_with(registry.clone()).err().unwrap();

        assert_eq!(err, ModuleError::Registration { name: "kernellab2".into(), errno: libc::ENOSPC });
        assert!(registry.is_empty());
    }

    #[test]
    fn test_failed_attribute_dir_unwinds() {
        let registry = Arc::new(NodeTable::with_capacity(2));
        let err = build_with(registry.clone()).err().unwrap();

        assert!(matches!(err, ModuleError::Registration { ref name, .. } if name == "kernellab"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_invalid_config_creates_nothing() {
        let registry = Arc::new(NodeTable::new());
        let err = Kernellab::builder()
            .config(ModuleConfig::new().device_prefix(""))
            .registry(registry.clone())
            .build()
            .err()
            .unwrap();

        assert!(matches!(err, ModuleError::InvalidConfig(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_devices_share_one_store() {
        let klab = build_with(Arc::new(NodeTable::new())).unwrap();
        let mm = Arc::new(AddressSpace::new());

        klab.open(DeviceMinor::CURRENT, Session::new(1, mm.clone())).unwrap();
        klab.open(DeviceMinor::PID, Session::new(2, mm)).unwrap();

        assert_eq!(klab.attributes().value(CountAttribute::CurrentCount), 1);
        assert_eq!(klab.attributes().value(CountAttribute::PidCount), 1);
        assert_eq!(klab.attributes().value(CountAttribute::AllCount), 2);
        assert_eq!(klab.counts().all_count, 2);
    }

    #[test]
    fn test_two_instances_need_distinct_names() {
        let registry = Arc::new(NodeTable::new());
        let _first = build_with(registry.clone()).unwrap();
        let err = build_with(registry.clone()).err().unwrap();

        assert_eq!(err, ModuleError::Registration { name: "kernellab1".into(), errno: libc::EEXIST });
        // the first instance's nodes survive the failed second start
        assert_eq!(registry.len(), 3);
    }
}
