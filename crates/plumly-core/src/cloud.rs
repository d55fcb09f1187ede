// ── Topology client ──
//
// Fan-out traversal of the cloud hierarchy. Each level fetches its
// children concurrently and joins them before returning; the first failure
// anywhere aborts the whole fetch and drops the outstanding siblings.

use futures_util::future::try_join_all;
use plumly_api::CloudClient;
use tracing::debug;

use crate::config::PlatformConfig;
use crate::error::{CloudError, CoreError};
use crate::model::{House, HouseTree, LogicalLoad, Room, RoomTree, Topology};

pub struct TopologyClient {
    cloud: CloudClient,
}

impl TopologyClient {
    pub fn new(config: &PlatformConfig) -> Result<Self, CoreError> {
        let cloud = CloudClient::new(
            config.cloud_url.clone(),
            config.credentials(),
            &config.cloud_transport(),
        )
        .map_err(|e| CoreError::Config {
            message: e.to_string(),
        })?;
        Ok(Self { cloud })
    }

    pub fn from_client(cloud: CloudClient) -> Self {
        Self { cloud }
    }

    /// Fetch every house, room and logical load, flattened to lightpads.
    ///
    /// Succeeds only if every nested request succeeds.
    pub async fn fetch_topology(&self) -> Result<Topology, CloudError> {
        debug!("getting houses");
        let hids = self.cloud.get_houses().await?;
        debug!(count = hids.len(), "found houses");

        let houses = try_join_all(hids.iter().map(|hid| self.fetch_house(hid))).await?;
        let topology = Topology::from_houses(houses);
        debug!(lightpads = topology.len(), "topology fetched");
        Ok(topology)
    }

    async fn fetch_house(&self, hid: &str) -> Result<HouseTree, CloudError> {
        debug!(hid, "getting house");
        let house = House::from(self.cloud.get_house(hid).await?);
        let rooms = try_join_all(house.rids.iter().map(|rid| self.fetch_room(rid))).await?;
        Ok(HouseTree { house, rooms })
    }

    async fn fetch_room(&self, rid: &str) -> Result<RoomTree, CloudError> {
        debug!(rid, "getting room");
        let room = Room::from(self.cloud.get_room(rid).await?);
        let loads = try_join_all(room.llids.iter().map(|llid| self.fetch_load(llid))).await?;
        Ok(RoomTree { room, loads })
    }

    async fn fetch_load(&self, llid: &str) -> Result<LogicalLoad, CloudError> {
        debug!(llid, "getting logical load");
        let load = self.cloud.get_logical_load(llid).await?;
        Ok(LogicalLoad::from(load))
    }
}
