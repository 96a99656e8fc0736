use crate::ConfigError;
use sr_packets::MacAddr;
use std::collections::HashMap;
use std::fmt;
use std::iter::FromIterator;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// One of the router's own interfaces, and the addresses it answers to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterfaceRecord {
    pub name: String,
    pub ip: Ipv4Addr,
    pub mac: MacAddr,
}

impl InterfaceRecord {
    pub fn new<S: Into<String>>(name: S, ip: Ipv4Addr, mac: MacAddr) -> Self {
        InterfaceRecord {
            name: name.into(),
            ip,
            mac,
        }
    }
}

impl fmt::Display for InterfaceRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{},{}", self.name, self.ip, self.mac)
    }
}

/// Parses `NAME,IP,MAC`, e.g. `eth0,10.0.0.1,bb:bb:bb:bb:bb:02`.
impl FromStr for InterfaceRecord {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split(',').map(str::trim).collect();
        let (name, ip, mac) = match fields.as_slice() {
            [name, ip, mac] if !name.is_empty() => (name, ip, mac),
            _ => return Err(ConfigError::Format(s.to_string())),
        };

        let ip = ip.parse::<Ipv4Addr>().map_err(|source| ConfigError::Ip {
            record: s.to_string(),
            source,
        })?;
        let mac = mac.parse::<MacAddr>().map_err(|reason| ConfigError::Mac {
            record: s.to_string(),
            reason,
        })?;

        Ok(InterfaceRecord::new(*name, ip, mac))
    }
}

/// Read-only directory of the router's interfaces, keyed by interface name.
#[derive(Clone, Debug, Default)]
pub struct InterfaceTable {
    records: HashMap<String, InterfaceRecord>,
}

impl InterfaceTable {
    pub fn new() -> Self {
        InterfaceTable {
            records: HashMap::new(),
        }
    }

    /// Adds a record, replacing (and returning) any earlier record with the same name.
    pub fn insert(&mut self, record: InterfaceRecord) -> Option<InterfaceRecord> {
        self.records.insert(record.name.clone(), record)
    }

    pub fn get(&self, name: &str) -> Option<&InterfaceRecord> {
        self.records.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InterfaceRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<InterfaceRecord> for InterfaceTable {
    fn from_iter<I: IntoIterator<Item = InterfaceRecord>>(iter: I) -> Self {
        let mut table = InterfaceTable::new();
        for record in iter {
            table.insert(record);
        }
        table
    }
}

/// The map keys are ignored, records are filed under their own `name`.
impl From<HashMap<String, InterfaceRecord>> for InterfaceTable {
    fn from(records: HashMap<String, InterfaceRecord>) -> Self {
        records.into_iter().map(|(_, record)| record).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::hashmap;

    fn eth0() -> InterfaceRecord {
        InterfaceRecord::new(
            "eth0",
            Ipv4Addr::new(10, 0, 0, 1),
            MacAddr::new([0xbb, 0xbb, 0xbb, 0xbb, 0xbb, 0x02]),
        )
    }

    #[test]
    fn parse_record() {
        let record: InterfaceRecord = "eth0,10.0.0.1,bb:bb:bb:bb:bb:02".parse().unwrap();
        assert_eq!(record, eth0());
        assert_eq!(record.to_string(), "eth0,10.0.0.1,bb:bb:bb:bb:bb:02");
    }

    #[test]
    fn parse_tolerates_spaces() {
        let record: InterfaceRecord = " eth0 , 10.0.0.1 , bb:bb:bb:bb:bb:02".parse().unwrap();
        assert_eq!(record, eth0());
    }

    #[test]
    fn parse_errors() {
        match "eth0,10.0.0.1".parse::<InterfaceRecord>() {
            Err(ConfigError::Format(_)) => {}
            other => panic!("expected a format error, got {:?}", other),
        }
        match ",10.0.0.1,bb:bb:bb:bb:bb:02".parse::<InterfaceRecord>() {
            Err(ConfigError::Format(_)) => {}
            other => panic!("expected a format error, got {:?}", other),
        }
        match "eth0,10.0.0.256,bb:bb:bb:bb:bb:02".parse::<InterfaceRecord>() {
            Err(ConfigError::Ip { .. }) => {}
            other => panic!("expected an IP error, got {:?}", other),
        }
        match "eth0,10.0.0.1,bb:bb:bb".parse::<InterfaceRecord>() {
            Err(ConfigError::Mac { .. }) => {}
            other => panic!("expected a MAC error, got {:?}", other),
        }
    }

    #[test]
    fn lookup() {
        let eth1 = InterfaceRecord::new(
            "eth1",
            Ipv4Addr::new(192, 168, 1, 1),
            MacAddr::new([0xbb, 0xbb, 0xbb, 0xbb, 0xbb, 0x03]),
        );
        let table: InterfaceTable = vec![eth0(), eth1.clone()].into_iter().collect();

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("eth0"), Some(&eth0()));
        assert_eq!(table.get("eth2"), None);
        assert_eq!(table.get("eth1"), Some(&eth1));
    }

    #[test]
    fn from_map_files_records_by_name() {
        let table = InterfaceTable::from(hashmap! {
            String::from("wrong-key") => eth0(),
        });
        assert!(table.get("wrong-key").is_none());
        assert_eq!(table.get("eth0"), Some(&eth0()));
    }

    #[test]
    fn insert_replaces() {
        let mut table = InterfaceTable::new();
        assert!(table.is_empty());
        assert_eq!(table.insert(eth0()), None);

        let mut moved = eth0();
        moved.ip = Ipv4Addr::new(10, 0, 0, 5);
        assert_eq!(table.insert(moved.clone()), Some(eth0()));
        assert_eq!(table.get("eth0"), Some(&moved));
        assert_eq!(table.iter().count(), 1);
    }
}
