//! Broker status tree
//!
//! A status reply describes one or more brokers. The root of the tree is
//! usually an unnamed container whose children are the individual brokers;
//! each broker lists its apply servers and queued jobs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name of the server task whose reply populates a [`BrokerStatus`]
pub const TASK_NAME: &str = "getbrokerstatus";

/// Status of a single apply server (a broker worker process)
///
/// Values are kept as reported by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplyServerInfo {
    pub id: String,
    pub pid: String,
    pub num_query: String,
    pub num_transaction: String,
    pub port: String,
    pub process_size: String,
    pub status: String,
    pub db_name: String,
    pub db_host: String,
    pub last_access_time: String,
    pub last_connect_time: String,
    pub client_ip: String,
    pub current_sql: String,
}

impl ApplyServerInfo {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Builder method: set status
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Builder method: set query and transaction counters
    pub fn with_counts(mut self, queries: impl Into<String>, transactions: impl Into<String>) -> Self {
        self.num_query = queries.into();
        self.num_transaction = transactions.into();
        self
    }

    /// Builder method: set the database this server is attached to
    pub fn with_database(mut self, db_name: impl Into<String>, db_host: impl Into<String>) -> Self {
        self.db_name = db_name.into();
        self.db_host = db_host.into();
        self
    }

    pub fn query_count(&self) -> Option<u64> {
        self.num_query.trim().parse().ok()
    }

    pub fn transaction_count(&self) -> Option<u64> {
        self.num_transaction.trim().parse().ok()
    }

    /// Whether the server is currently serving a request
    pub fn is_busy(&self) -> bool {
        self.status.trim().eq_ignore_ascii_case("BUSY")
    }
}

/// A request queued on a broker
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobInfo {
    pub id: String,
    pub priority: String,
    pub ip: String,
    pub time: String,
    pub request: String,
}

impl JobInfo {
    pub fn new(id: impl Into<String>, request: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            request: request.into(),
            ..Default::default()
        }
    }
}

/// Counters aggregated over a broker subtree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTotals {
    /// Named brokers in the subtree, including the root when named
    pub brokers: usize,
    pub apply_servers: usize,
    pub busy_apply_servers: usize,
    /// Sum of parseable query counters
    pub queries: u64,
    /// Sum of parseable transaction counters
    pub transactions: u64,
    pub jobs: usize,
}

impl std::ops::AddAssign for StatusTotals {
    fn add_assign(&mut self, other: Self) {
        self.brokers += other.brokers;
        self.apply_servers += other.apply_servers;
        self.busy_apply_servers += other.busy_apply_servers;
        self.queries += other.queries;
        self.transactions += other.transactions;
        self.jobs += other.jobs;
    }
}

/// Broker status node
///
/// # Examples
///
/// ```
/// use dbadm_monitor::{ApplyServerInfo, BrokerStatus};
///
/// let mut query_broker = BrokerStatus::named("query_editor");
/// query_broker.add_apply_server(ApplyServerInfo::new("1").with_status("BUSY"));
///
/// let mut root = BrokerStatus::new();
/// root.add_broker(query_broker);
/// root.add_broker(BrokerStatus::named("broker1"));
///
/// let found = root.sub_broker_by_name(Some("query_editor")).unwrap();
/// assert_eq!(found.apply_servers().len(), 1);
/// assert_eq!(root.totals().busy_apply_servers, 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerStatus {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    apply_servers: Vec<ApplyServerInfo>,
    #[serde(default)]
    jobs: Vec<JobInfo>,
    #[serde(default)]
    sub_brokers: Vec<BrokerStatus>,
    #[serde(default = "Utc::now")]
    retrieved_at: DateTime<Utc>,
}

impl Default for BrokerStatus {
    fn default() -> Self {
        Self::new()
    }
}

impl BrokerStatus {
    /// Create an unnamed node, typically the root of a reply
    pub fn new() -> Self {
        Self {
            name: None,
            apply_servers: Vec::new(),
            jobs: Vec::new(),
            sub_brokers: Vec::new(),
            retrieved_at: Utc::now(),
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new()
        }
    }

    pub fn task_name(&self) -> &'static str {
        TASK_NAME
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn retrieved_at(&self) -> DateTime<Utc> {
        self.retrieved_at
    }

    pub fn apply_servers(&self) -> &[ApplyServerInfo] {
        &self.apply_servers
    }

    pub fn jobs(&self) -> &[JobInfo] {
        &self.jobs
    }

    /// Direct children
    pub fn brokers(&self) -> &[BrokerStatus] {
        &self.sub_brokers
    }

    /// Add an apply server unless an identical entry is already present
    pub fn add_apply_server(&mut self, info: ApplyServerInfo) {
        if !self.apply_servers.contains(&info) {
            self.apply_servers.push(info);
        }
    }

    /// Add a job unless an identical entry is already present
    pub fn add_job(&mut self, job: JobInfo) {
        if !self.jobs.contains(&job) {
            self.jobs.push(job);
        }
    }

    pub fn add_broker(&mut self, broker: BrokerStatus) {
        self.sub_brokers.push(broker);
    }

    /// Look up a broker by name among the direct children, then this node.
    ///
    /// `None` is returned for an absent name or when nothing matches.
    pub fn sub_broker_by_name(&self, name: Option<&str>) -> Option<&BrokerStatus> {
        let name = name?;
        let found = self
            .sub_brokers
            .iter()
            .find(|broker| broker.name() == Some(name))
            .or_else(|| (self.name() == Some(name)).then_some(self));

        if found.is_none() {
            tracing::debug!(broker = name, "broker not found in status reply");
        }
        found
    }

    /// Mutable variant of [`sub_broker_by_name`](Self::sub_broker_by_name)
    pub fn sub_broker_by_name_mut(&mut self, name: Option<&str>) -> Option<&mut BrokerStatus> {
        let name = name?;
        if let Some(index) = self
            .sub_brokers
            .iter()
            .position(|broker| broker.name() == Some(name))
        {
            return self.sub_brokers.get_mut(index);
        }
        if self.name() == Some(name) {
            return Some(self);
        }
        None
    }

    /// Depth-first search of the whole subtree, this node first
    pub fn find(&self, name: &str) -> Option<&BrokerStatus> {
        if self.name() == Some(name) {
            return Some(self);
        }
        self.sub_brokers.iter().find_map(|broker| broker.find(name))
    }

    /// Aggregate counters over this node and all descendants
    pub fn totals(&self) -> StatusTotals {
        let mut totals = StatusTotals {
            brokers: usize::from(self.name.is_some()),
            apply_servers: self.apply_servers.len(),
            busy_apply_servers: self.apply_servers.iter().filter(|s| s.is_busy()).count(),
            queries: self
                .apply_servers
                .iter()
                .filter_map(ApplyServerInfo::query_count)
                .sum(),
            transactions: self
                .apply_servers
                .iter()
                .filter_map(ApplyServerInfo::transaction_count)
                .sum(),
            jobs: self.jobs.len(),
        };
        for broker in &self.sub_brokers {
            totals += broker.totals();
        }
        totals
    }
}
