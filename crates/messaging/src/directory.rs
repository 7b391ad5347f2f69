//! Bootstrap directory data: teams, agents, clients, and channels.
//!
//! The broker only references these records by id; they are owned here and
//! served read-only through the gateway. At startup the loader can refresh
//! the agent roster from a remote endpoint, falling back to the built-in seed
//! dataset when the fetch fails.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::entities::{ChatMessage, Room};
use crate::types::BrokerResult;

/// Online/offline indicator for directory entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    Online,
    Offline,
}

/// A team of support agents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub channel_count: u32,
}

/// A support agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub name: String,
    pub team_id: String,
    pub status: PresenceStatus,
    pub email: String,
    pub phone: String,
}

/// A client counterpart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: PresenceStatus,
}

/// Messaging channel kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Whatsapp,
    Instagram,
}

/// An inbound messaging channel attached to a team
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub kind: ChannelKind,
    pub team_id: String,
}

/// Directory listings referenced by id from rooms and messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Directory {
    pub teams: Vec<Team>,
    pub agents: Vec<Agent>,
    pub clients: Vec<Client>,
    pub channels: Vec<Channel>,
}

impl Directory {
    /// The built-in demo dataset
    pub fn seed() -> Self {
        Self {
            teams: vec![
                team("team1", "Sales", 7),
                team("team2", "Customer Support", 16),
            ],
            agents: vec![
                agent("u1", "Sarah Williams", "team2", PresenceStatus::Online, "sarah.williams@gmail.com", "+1 (301) 555-0135"),
                agent("u2", "Michael Johnson", "team1", PresenceStatus::Offline, "michael.j@gmail.com", "+1 (302) 555-0136"),
                agent("u3", "Olivia Mckinsey", "team1", PresenceStatus::Online, "olivia.mckinsey@gmail.com", "+1 (303) 555-0134"),
                agent("u4", "Ethan Hunt", "team1", PresenceStatus::Online, "ethan.hunt@gmail.com", "+1 (304) 555-0137"),
                agent("u5", "Sophia Miller", "team2", PresenceStatus::Online, "sophia.m@gmail.com", "+1 (305) 555-0138"),
            ],
            clients: vec![
                client("c1", "Alex Carter", "alex.c@example.com", "+1 555-1001", PresenceStatus::Offline),
                client("c2", "Brian Smith", "brian.s@example.com", "+1 555-1002", PresenceStatus::Online),
                client("c3", "Chloe Davis", "chloe.d@example.com", "+1 555-1003", PresenceStatus::Offline),
                client("c4", "Diana Prince", "diana.p@example.com", "+1 555-1004", PresenceStatus::Online),
                client("c5", "Edward Norton", "edward.n@example.com", "+1 555-1005", PresenceStatus::Online),
                client("c6", "Fiona Gallagher", "fiona.g@example.com", "+1 555-1006", PresenceStatus::Offline),
            ],
            channels: vec![
                channel("ch1", "Fit4Life", ChannelKind::Whatsapp, "team1"),
                channel("ch2", "Fit4Life", ChannelKind::Instagram, "team2"),
                channel("ch3", "TechSupport", ChannelKind::Whatsapp, "team2"),
            ],
        }
    }

    /// Look up a client by id
    pub fn client(&self, id: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    /// Look up an agent by id
    pub fn agent(&self, id: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }
}

/// Demo rooms registered at startup
pub fn seed_rooms() -> Vec<Room> {
    vec![
        Room::direct("room1", "u2", "c1").with_summary("I'll try it ASAP, thank..", "23:23", 0),
        Room::direct("room2", "u2", "c2").with_summary("Are we still on for...", "23:16", 1),
        Room::direct("room3", "u1", "c3").with_summary("Can you help me with my account?", "22:28", 2),
        Room::direct("room4", "u1", "c4").with_summary("Perfect, everything works now. Thanks!", "14:10", 0),
        Room::direct("room5", "u3", "c1").with_summary("Can we schedule a call for tomorrow?", "09:00", 0),
        Room::direct("room6", "u4", "c5").with_summary("Looking forward to it!", "10:30", 0),
        Room::direct("room7", "u5", "c6").with_summary("I have a question about the invoice.", "11:45", 1),
    ]
}

/// Demo history backing the seed rooms
pub fn seed_history() -> Vec<ChatMessage> {
    vec![
        msg(1, "room1", "c1", "Hi, I recently joined Fit4Life and I'm trying to access my workout plan, but I can't login.\nCan you help?", "23:08", true),
        msg(2, "room1", "u2", "Hello Alex! I'm Michael, your customer support assistant. Let's fix this quickly.\nCould you confirm the email address?", "23:08", true),
        msg(3, "room1", "c1", "Yes, it's alex.c@example.com", "23:16", true),
        msg(4, "room1", "u2", "Thanks! Looks like your reset wasn't completed. I've sent a new link - please check your inbox.", "23:16", true),
        msg(5, "room1", "c1", "I see it. resetting now...", "23:17", true),
        msg(6, "room1", "c1", "Done! I'm logged in. Thanks!", "23:20", true),
        msg(7, "room1", "u2", "Perfect! Your plan is ready under \"My Programs\". Since you're starting out, I suggest our Premium Guide - it boosts results and is 20% off at www.Fit4Life.com/Premium", "23:20", true),
        msg(8, "room1", "c1", "I'll try it ASAP, thank you so much!!", "23:23", true),
        msg(9, "room2", "c2", "Hi Michael, are we still on for the 4PM call?", "09:00", true),
        msg(10, "room2", "u2", "Yes, absolutely! I have it marked on my calendar.", "09:15", true),
        msg(11, "room2", "c2", "Are we still on for...", "23:16", false),
        msg(12, "room3", "c3", "Hey Sarah, Can you help me with my account?", "22:28", false),
        msg(13, "room3", "c3", "I can't seem to access the new dashboard features.", "22:29", false),
        msg(14, "room4", "u1", "Hi Diana, I've enabled the feature for your account.", "14:05", true),
        msg(15, "room4", "c4", "Perfect, everything works now. Thanks!", "14:10", true),
        msg(16, "room5", "c1", "Hi Olivia, Can we schedule a call for tomorrow?", "09:00", true),
        msg(17, "room6", "c5", "Hi Ethan, just checking in on the project status.", "10:20", true),
        msg(18, "room6", "u4", "Looking forward to it!", "10:30", true),
        msg(19, "room7", "c6", "Hi Sophia, I have a question about the invoice.", "11:45", false),
    ]
}

fn team(id: &str, name: &str, channel_count: u32) -> Team {
    Team {
        id: id.to_string(),
        name: name.to_string(),
        channel_count,
    }
}

fn agent(
    id: &str,
    name: &str,
    team_id: &str,
    status: PresenceStatus,
    email: &str,
    phone: &str,
) -> Agent {
    Agent {
        id: id.to_string(),
        name: name.to_string(),
        team_id: team_id.to_string(),
        status,
        email: email.to_string(),
        phone: phone.to_string(),
    }
}

fn client(id: &str, name: &str, email: &str, phone: &str, status: PresenceStatus) -> Client {
    Client {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        status,
    }
}

fn channel(id: &str, name: &str, kind: ChannelKind, team_id: &str) -> Channel {
    Channel {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        team_id: team_id.to_string(),
    }
}

fn msg(id: i64, room_id: &str, sender_id: &str, text: &str, time: &str, read: bool) -> ChatMessage {
    ChatMessage {
        id,
        room_id: room_id.to_string(),
        sender_id: sender_id.to_string(),
        text: text.to_string(),
        time: time.to_string(),
        read,
    }
}

/// Shape of the remote roster payload
#[derive(Debug, Deserialize)]
struct RemoteRoster {
    users: Vec<RemoteUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteUser {
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
}

/// Loads directory data at startup.
///
/// When a roster endpoint is configured, its users replace the seed agents;
/// any transport failure is logged and the seed dataset is kept, so bootstrap
/// never takes the process down.
pub struct DirectoryLoader {
    users_url: Option<String>,
    request_timeout: Duration,
}

impl DirectoryLoader {
    pub fn new(users_url: Option<String>, request_timeout: Duration) -> Self {
        Self {
            users_url,
            request_timeout,
        }
    }

    /// Load the directory, substituting seed data on any fetch failure
    pub async fn load(&self) -> Directory {
        let mut directory = Directory::seed();

        let Some(url) = self.users_url.as_deref() else {
            info!("no remote roster configured, using seed directory");
            return directory;
        };

        match self.fetch_agents(url).await {
            Ok(agents) if !agents.is_empty() => {
                info!(count = agents.len(), "remote roster loaded");
                directory.agents = agents;
            }
            Ok(_) => {
                warn!("remote roster was empty, keeping seed agents");
            }
            Err(error) => {
                warn!(%error, "remote roster fetch failed, falling back to seed directory");
            }
        }
        directory
    }

    async fn fetch_agents(&self, url: &str) -> BrokerResult<Vec<Agent>> {
        let http = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()?;

        let roster: RemoteRoster = http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        // Remote users carry no team or presence; assign both round-robin.
        Ok(roster
            .users
            .into_iter()
            .enumerate()
            .map(|(index, user)| Agent {
                id: format!("u{}", index + 1),
                name: format!("{} {}", user.first_name, user.last_name),
                team_id: if index % 2 == 0 { "team1" } else { "team2" }.to_string(),
                status: if index % 2 == 0 {
                    PresenceStatus::Online
                } else {
                    PresenceStatus::Offline
                },
                email: user.email,
                phone: user.phone,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_rooms_reference_seed_directory() {
        let directory = Directory::seed();
        for room in seed_rooms() {
            assert!(directory.agent(&room.agent_id).is_some(), "agent {} missing", room.agent_id);
            assert!(directory.client(&room.client_id).is_some(), "client {} missing", room.client_id);
        }
    }

    #[test]
    fn test_seed_history_rooms_exist() {
        let room_ids: Vec<String> = seed_rooms().into_iter().map(|r| r.id).collect();
        for message in seed_history() {
            assert!(room_ids.contains(&message.room_id));
        }
    }

    #[test]
    fn test_seed_history_ids_are_strictly_increasing() {
        let history = seed_history();
        for pair in history.windows(2) {
            assert!(pair[0].id < pair[1].id);
        }
    }

    #[tokio::test]
    async fn test_loader_without_url_uses_seed() {
        let loader = DirectoryLoader::new(None, Duration::from_secs(1));
        let directory = loader.load().await;
        assert_eq!(directory.agents.len(), 5);
        assert_eq!(directory.teams.len(), 2);
    }

    #[tokio::test]
    async fn test_loader_falls_back_on_unreachable_roster() {
        let loader = DirectoryLoader::new(
            Some("http://127.0.0.1:9/users".to_string()),
            Duration::from_millis(200),
        );
        let directory = loader.load().await;
        assert_eq!(directory.agents.len(), 5);
    }

    #[test]
    fn test_remote_roster_parsing() {
        let payload = serde_json::json!({
            "users": [
                { "firstName": "Terry", "lastName": "Medhurst", "email": "t@example.com", "phone": "+1 555-2001" }
            ]
        });
        let roster: RemoteRoster = serde_json::from_value(payload).expect("parse roster");
        assert_eq!(roster.users.len(), 1);
        assert_eq!(roster.users[0].first_name, "Terry");
    }
}
