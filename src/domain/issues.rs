//! Marvis suggestion counters grouped by category and symptom.
//!
//! Only the four connectivity sub-categories carry a `total`; it is derived from
//! the other counters after decoding and never read from the payload.

use crate::domain::decode::{decode, join_path, null_as_default, SchemaResult};
use crate::utils::error::{SchemaValidationError, SchemaViolation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A fixed set of named integer counters.
pub trait CounterSet {
    fn counters(&self) -> Vec<(&'static str, i64)>;
}

/// Sum of every counter in the set, or `None` if it does not fit in an `i64`.
pub fn sum_counters<C: CounterSet + ?Sized>(set: &C) -> Option<i64> {
    set.counters()
        .iter()
        .try_fold(0i64, |acc, (_, value)| acc.checked_add(*value))
}

/// Counters frozen together with their computed total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tallied<C> {
    #[serde(flatten)]
    counters: C,
    total: i64,
}

impl<C: CounterSet> Tallied<C> {
    pub fn new(counters: C) -> Option<Self> {
        let total = sum_counters(&counters)?;
        Some(Self { counters, total })
    }

    pub fn counters(&self) -> &C {
        &self.counters
    }

    pub fn total(&self) -> i64 {
        self.total
    }
}

fn tally<C: CounterSet>(path: &str, name: &str, counters: C) -> SchemaResult<Tallied<C>> {
    Tallied::new(counters).ok_or_else(|| {
        SchemaValidationError::new(
            join_path(&join_path(path, name), "total"),
            SchemaViolation::CounterOverflow,
        )
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthFailure {
    pub scope: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub wlan: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub radius: i64,
}

impl CounterSet for AuthFailure {
    fn counters(&self) -> Vec<(&'static str, i64)> {
        vec![
            ("scope", self.scope),
            ("wlan", self.wlan),
            ("radius", self.radius),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DhcpFailure {
    pub scope: i64,
    #[serde(
        rename = "MARVIS_EVENT_CLIENT_DHCP_FAILURE",
        default,
        deserialize_with = "null_as_default"
    )]
    pub marvis_event_client_dhcp_failure: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dhcp: i64,
}

impl CounterSet for DhcpFailure {
    fn counters(&self) -> Vec<(&'static str, i64)> {
        vec![
            ("scope", self.scope),
            (
                "MARVIS_EVENT_CLIENT_DHCP_FAILURE",
                self.marvis_event_client_dhcp_failure,
            ),
            ("dhcp", self.dhcp),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArpFailure {
    pub scope: i64,
    #[serde(
        rename = "CLIENT_GW_ARP_FAILURE",
        default,
        deserialize_with = "null_as_default"
    )]
    pub client_gw_arp_failure: i64,
}

impl CounterSet for ArpFailure {
    fn counters(&self) -> Vec<(&'static str, i64)> {
        vec![
            ("scope", self.scope),
            ("CLIENT_GW_ARP_FAILURE", self.client_gw_arp_failure),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsFailure {
    pub scope: i64,
    #[serde(
        rename = "MARVIS_DNS_FAILURE",
        default,
        deserialize_with = "null_as_default"
    )]
    pub marvis_dns_failure: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dns: i64,
}

impl CounterSet for DnsFailure {
    fn counters(&self) -> Vec<(&'static str, i64)> {
        vec![
            ("scope", self.scope),
            ("MARVIS_DNS_FAILURE", self.marvis_dns_failure),
            ("dns", self.dns),
        ]
    }
}

/// Connectivity counters as decoded, before totals exist.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectivityCounters {
    pub auth_failure: AuthFailure,
    pub dhcp_failure: DhcpFailure,
    pub arp_failure: ArpFailure,
    pub dns_failure: DnsFailure,
}

impl ConnectivityCounters {
    /// Freezes each sub-category with its total; `path` locates the group for errors.
    pub fn tally(self, path: &str) -> SchemaResult<Connectivity> {
        Ok(Connectivity {
            auth_failure: tally(path, "auth_failure", self.auth_failure)?,
            dhcp_failure: tally(path, "dhcp_failure", self.dhcp_failure)?,
            arp_failure: tally(path, "arp_failure", self.arp_failure)?,
            dns_failure: tally(path, "dns_failure", self.dns_failure)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Connectivity {
    pub auth_failure: Tallied<AuthFailure>,
    pub dhcp_failure: Tallied<DhcpFailure>,
    pub arp_failure: Tallied<ArpFailure>,
    pub dns_failure: Tallied<DnsFailure>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApCount {
    #[serde(default, deserialize_with = "null_as_default")]
    pub ap: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApDisconnect {
    #[serde(default, deserialize_with = "null_as_default")]
    pub ap: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub switch: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceCount {
    #[serde(default, deserialize_with = "null_as_default")]
    pub interface: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchCount {
    #[serde(default, deserialize_with = "null_as_default")]
    pub switch: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteCount {
    #[serde(default, deserialize_with = "null_as_default")]
    pub site: i64,
}

/// Cable faults seen on gateway or layer 1 links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CableFault {
    #[serde(default, deserialize_with = "null_as_default")]
    pub interface: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ap: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPoint {
    #[serde(default, deserialize_with = "null_as_default")]
    pub ap_disconnect: ApDisconnect,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ethernet_error: ApCount,
    #[serde(default, deserialize_with = "null_as_default")]
    pub health_check: ApCount,
    #[serde(default, deserialize_with = "null_as_default")]
    pub insufficient_capacity: ApCount,
    #[serde(default, deserialize_with = "null_as_default")]
    pub insufficient_coverage: ApCount,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Switch {
    #[serde(default, deserialize_with = "null_as_default")]
    pub bad_cable: InterfaceCount,
    #[serde(default, deserialize_with = "null_as_default")]
    pub missing_vlan: SwitchCount,
    #[serde(default, deserialize_with = "null_as_default")]
    pub negotiation_mismatch: InterfaceCount,
    #[serde(default, deserialize_with = "null_as_default")]
    pub port_flap: InterfaceCount,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stp_loop: SiteCount,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gateway {
    #[serde(default, deserialize_with = "null_as_default")]
    pub bad_wan_link: InterfaceCount,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bad_cable: CableFault,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vpn_path_down: InterfaceCount,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer1 {
    #[serde(default, deserialize_with = "null_as_default")]
    pub bad_cable: CableFault,
}

/// Issue groups as decoded, before connectivity totals exist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IssueGroups {
    pub connectivity: Option<ConnectivityCounters>,
    #[serde(alias = "ap")]
    pub access_point: Option<AccessPoint>,
    pub switch: Option<Switch>,
    pub gateway: Option<Gateway>,
    #[serde(alias = "layer_1")]
    pub layer1: Option<Layer1>,
}

impl IssueGroups {
    /// Derives connectivity totals; `path` locates the groups for errors.
    pub fn tally(self, path: &str) -> SchemaResult<MarvisIssues> {
        let connectivity = self
            .connectivity
            .map(|counters| counters.tally(&join_path(path, "connectivity")))
            .transpose()?;

        Ok(MarvisIssues {
            connectivity,
            access_point: self.access_point,
            switch: self.switch,
            gateway: self.gateway,
            layer1: self.layer1,
        })
    }
}

#[derive(Deserialize)]
struct SuggestionsResponse {
    data: IssueGroups,
}

/// Issue summary for one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarvisIssues {
    pub connectivity: Option<Connectivity>,
    pub access_point: Option<AccessPoint>,
    pub switch: Option<Switch>,
    pub gateway: Option<Gateway>,
    pub layer1: Option<Layer1>,
}

impl MarvisIssues {
    /// Builds the summary from a full suggestions response (`{"data": {...}}`).
    pub fn from_response(value: &Value) -> SchemaResult<Self> {
        decode::<SuggestionsResponse>(value)?.data.tally("data")
    }

    /// Builds the summary from the contents of the response's `data` member.
    pub fn from_data(value: &Value) -> SchemaResult<Self> {
        decode::<IssueGroups>(value)?.tally("")
    }

    pub fn is_empty(&self) -> bool {
        self.connectivity.is_none()
            && self.access_point.is_none()
            && self.switch.is_none()
            && self.gateway.is_none()
            && self.layer1.is_none()
    }
}
