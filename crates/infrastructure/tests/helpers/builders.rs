use hickory_proto::rr::rdata::{A, AAAA, NS};
use hickory_proto::rr::{Name, RData, Record};
use onion_gateway_domain::OnionAddress;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

pub const ONION: &str = "t3mny6lhnyku4wrd.onion";
pub const OTHER_ONION: &str = "expyuzz4wqqyqhjn.onion";

pub fn name(value: &str) -> Name {
    Name::from_str(value).unwrap()
}

pub fn ns_record(owner: &str, target: &str, ttl: u32) -> Record {
    Record::from_rdata(name(owner), ttl, RData::NS(NS(name(target))))
}

pub fn a_record(owner: &str, ip: Ipv4Addr, ttl: u32) -> Record {
    Record::from_rdata(name(owner), ttl, RData::A(A(ip)))
}

pub fn aaaa_record(owner: &str, ip: Ipv6Addr, ttl: u32) -> Record {
    Record::from_rdata(name(owner), ttl, RData::AAAA(AAAA(ip)))
}

pub fn onion() -> OnionAddress {
    OnionAddress::parse(ONION).unwrap()
}

pub fn other_onion() -> OnionAddress {
    OnionAddress::parse(OTHER_ONION).unwrap()
}

/// `<onion>.ns.<zone>`, the shape gateway nameservers publish.
pub fn onion_nameserver(onion: &str, zone: &str) -> String {
    format!("{}.ns.{}", onion, zone)
}
