// ── API-to-domain type conversions ──
//
// Bridges raw `plumly_api` wire types into canonical domain types.

use plumly_api::{HouseDetail, LogicalLoadDetail, RoomDetail};

use crate::model::{House, LightpadId, LogicalLoad, Room};

impl From<HouseDetail> for House {
    fn from(h: HouseDetail) -> Self {
        Self {
            hid: h.hid,
            name: h.house_name,
            access_token: h.house_access_token,
            rids: h.rids,
        }
    }
}

impl From<RoomDetail> for Room {
    fn from(r: RoomDetail) -> Self {
        Self {
            rid: r.rid,
            name: r.room_name,
            llids: r.llids,
        }
    }
}

impl From<LogicalLoadDetail> for LogicalLoad {
    fn from(l: LogicalLoadDetail) -> Self {
        Self {
            llid: l.llid,
            name: l.logical_load_name,
            lpids: l.lpids.into_iter().map(LightpadId::from).collect(),
            level: l.level,
        }
    }
}
