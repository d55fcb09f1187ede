// ── Cloud topology ──
//
// House → room → logical load → lightpad, as fetched from the cloud, and
// the flattened lightpad → context view the reconciler works on.

use indexmap::IndexMap;
use secrecy::SecretString;
use serde::Serialize;
use tracing::debug;

use super::lightpad::LightpadId;

/// A house and the secret that authenticates local commands.
#[derive(Debug, Clone, Serialize)]
pub struct House {
    pub hid: String,
    pub name: Option<String>,
    /// Only ever sent to lightpads as a SHA-256 digest.
    #[serde(skip_serializing)]
    pub access_token: SecretString,
    pub rids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Room {
    pub rid: String,
    pub name: String,
    pub llids: Vec<String>,
}

/// A controllable circuit. Every member lightpad controls and reports the
/// same level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogicalLoad {
    pub llid: String,
    pub name: String,
    pub lpids: Vec<LightpadId>,
    /// Device-scale level (0-255), cached from the last command or fetch.
    pub level: Option<u8>,
}

/// The `{room, house, load}` snapshot a device handle carries.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceContext {
    pub room: Room,
    pub house: House,
    pub load: LogicalLoad,
}

impl DeviceContext {
    /// `"{room name} {load name}"`.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.room.name, self.load.name)
    }
}

/// One room with every logical load fetched.
#[derive(Debug, Clone)]
pub struct RoomTree {
    pub room: Room,
    pub loads: Vec<LogicalLoad>,
}

/// One house with every room fetched.
#[derive(Debug, Clone)]
pub struct HouseTree {
    pub house: House,
    pub rooms: Vec<RoomTree>,
}

/// Flattened topology: lightpad id → context, in traversal order.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    devices: IndexMap<LightpadId, DeviceContext>,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten fetched houses in house, room, load, lightpad order.
    ///
    /// A lightpad listed under more than one load keeps the context of the
    /// last load seen.
    pub fn from_houses(houses: Vec<HouseTree>) -> Self {
        let mut topology = Self::new();
        for tree in houses {
            for room_tree in tree.rooms {
                for load in room_tree.loads {
                    for lpid in &load.lpids {
                        topology.insert(
                            lpid.clone(),
                            DeviceContext {
                                room: room_tree.room.clone(),
                                house: tree.house.clone(),
                                load: load.clone(),
                            },
                        );
                    }
                }
            }
        }
        topology
    }

    /// Insert a lightpad's context. Returns the context it displaced, if any.
    pub fn insert(&mut self, lpid: LightpadId, context: DeviceContext) -> Option<DeviceContext> {
        let previous = self.devices.insert(lpid, context);
        if let Some(ref old) = previous {
            debug!(llid = %old.load.llid, "lightpad listed in more than one load; last one wins");
        }
        previous
    }

    pub fn get(&self, lpid: &LightpadId) -> Option<&DeviceContext> {
        self.devices.get(lpid)
    }

    pub fn contains(&self, lpid: &LightpadId) -> bool {
        self.devices.contains_key(lpid)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LightpadId, &DeviceContext)> {
        self.devices.iter()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn house(hid: &str) -> House {
        House {
            hid: hid.into(),
            name: None,
            access_token: SecretString::from(format!("{hid}-token")),
            rids: Vec::new(),
        }
    }

    pub(crate) fn room(rid: &str, name: &str) -> Room {
        Room {
            rid: rid.into(),
            name: name.into(),
            llids: Vec::new(),
        }
    }

    pub(crate) fn load(llid: &str, name: &str, lpids: &[&str]) -> LogicalLoad {
        LogicalLoad {
            llid: llid.into(),
            name: name.into(),
            lpids: lpids.iter().map(|id| LightpadId::from(*id)).collect(),
            level: None,
        }
    }

    #[test]
    fn flattens_in_traversal_order() {
        let topology = Topology::from_houses(vec![HouseTree {
            house: house("h1"),
            rooms: vec![
                RoomTree {
                    room: room("r1", "Kitchen"),
                    loads: vec![load("l1", "Pendants", &["a", "b"])],
                },
                RoomTree {
                    room: room("r2", "Hall"),
                    loads: vec![load("l2", "Sconces", &["c"])],
                },
            ],
        }]);

        let ids: Vec<&str> = topology.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        let c = topology.get(&LightpadId::from("c")).unwrap();
        assert_eq!(c.display_name(), "Hall Sconces");
        assert_eq!(c.house.hid, "h1");
    }

    #[test]
    fn duplicate_lightpad_last_load_wins() {
        let topology = Topology::from_houses(vec![HouseTree {
            house: house("h1"),
            rooms: vec![RoomTree {
                room: room("r1", "Den"),
                loads: vec![load("l1", "First", &["a"]), load("l2", "Second", &["a"])],
            }],
        }]);

        assert_eq!(topology.len(), 1);
        let a = topology.get(&LightpadId::from("a")).unwrap();
        assert_eq!(a.load.llid, "l2");
    }

    #[test]
    fn empty_houses_give_empty_topology() {
        let topology = Topology::from_houses(vec![HouseTree {
            house: house("h1"),
            rooms: Vec::new(),
        }]);
        assert!(topology.is_empty());
    }
}
