use crate::Error;

/// A ledger entity identifier in `shard.realm.num` form, e.g. `0.0.7319830`.  Topics and
/// accounts are both addressed this way.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    serde_with::DeserializeFromStr,
    serde_with::SerializeDisplay,
)]
pub struct EntityId {
    pub shard: u64,
    pub realm: u64,
    pub num: u64,
}

pub type TopicId = EntityId;
pub type AccountId = EntityId;

impl EntityId {
    pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
        Self { shard, realm, num }
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

impl std::str::FromStr for EntityId {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || Error::MalformedDID(format!("malformed entity id {:?}", s).into());
        let mut component_i = s.split('.');
        let mut next_component = || -> Result<u64, Error> {
            component_i
                .next()
                .ok_or_else(malformed)?
                .parse::<u64>()
                .map_err(|_| malformed())
        };
        let shard = next_component()?;
        let realm = next_component()?;
        let num = next_component()?;
        if component_i.next().is_some() {
            return Err(malformed());
        }
        Ok(Self { shard, realm, num })
    }
}
