// MIT License - Copyright (c) 2026 adt2mqtt authors
// MQTT bridge

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use serde::{Deserialize, Serialize};
use tokio::signal::unix::{signal, SignalKind};
use tokio::time::{interval, Duration};
use tracing::{debug, error, info, warn};

use adt_panel_bridge::{Accessory, AccessoryHost, DeviceContext, Platform};

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "adt2mqtt")]
#[command(about = "Bridge between an ADT security panel (SmartThings cloud) and MQTT")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: String,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Config {
    mqtt: MqttToml,
    #[serde(default)]
    devices: Vec<DeviceToml>,
}

#[derive(Debug, Deserialize)]
struct MqttToml {
    url: String,
    #[serde(default = "default_client_id")]
    client_id: String,
    #[serde(default = "default_subscribe_topic")]
    subscribe_topic: String,
    #[serde(default = "default_publish_topic")]
    publish_topic: String,
    #[serde(default = "default_poll_interval")]
    poll_interval_secs: u64,
}

fn default_client_id() -> String {
    "adt-bridge".to_string()
}
fn default_subscribe_topic() -> String {
    "adt/cmd".to_string()
}
fn default_publish_topic() -> String {
    "adt".to_string()
}
fn default_poll_interval() -> u64 {
    60
}

#[derive(Debug, Deserialize)]
struct DeviceToml {
    display_name: String,
    device_id: String,
    api_key: String,
    home_scene: String,
    away_scene: String,
    night_scene: String,
}

fn build_device_contexts(devices: &[DeviceToml]) -> Result<Vec<DeviceContext>> {
    devices
        .iter()
        .map(|d| {
            DeviceContext::builder()
                .display_name(&d.display_name)
                .device_id(&d.device_id)
                .api_key(&d.api_key)
                .home_scene(&d.home_scene)
                .away_scene(&d.away_scene)
                .night_scene(&d.night_scene)
                .build()
                .with_context(|| format!("Invalid device entry {:?}", d.display_name))
        })
        .collect()
}

fn load_config(path: &str) -> Result<Config> {
    let text = std::fs::read_to_string(path).context("Failed to read config file")?;
    let config: Config = toml::from_str(&text).context("Failed to parse config file")?;
    if config.devices.is_empty() {
        anyhow::bail!("No [[devices]] entries in config");
    }
    Ok(config)
}

// ---------------------------------------------------------------------------
// MQTT JSON types
// ---------------------------------------------------------------------------

// Published messages — all share {now, op, ...} flat structure

#[derive(Serialize)]
struct MqttStateEvent {
    now: u64,
    op: String,
    device: String,
    value: u8,
}

// CMD_ACK response
#[derive(Serialize)]
struct MqttCmdAck {
    now: u64,
    op: String,
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    src: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
}

// Inbound command (subscribed)
#[derive(Deserialize)]
struct MqttCommand {
    op: String,
    #[serde(default)]
    device: Option<String>,
    #[serde(default)]
    value: Option<i64>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn now_epoch_ms() -> u64 {
    Utc::now().timestamp_millis() as u64
}

async fn publish_json(client: &AsyncClient, topic: &str, payload: &impl Serialize, retain: bool) {
    match serde_json::to_string(payload) {
        Ok(json) => {
            if let Err(e) = client.publish(topic, QoS::AtLeastOnce, retain, json).await {
                error!("Failed to publish to {topic}: {e}");
            }
        }
        Err(e) => error!("Failed to serialize MQTT payload: {e}"),
    }
}

async fn publish_cmd_ack(
    client: &AsyncClient,
    topic: &str,
    success: bool,
    src: Option<serde_json::Value>,
    data: Option<serde_json::Value>,
) {
    let msg = MqttCmdAck {
        now: now_epoch_ms(),
        op: "CMD_ACK".to_string(),
        success,
        src,
        data,
    };
    publish_json(client, topic, &msg, false).await;
}

// ---------------------------------------------------------------------------
// MQTT host — collects the accessories the platform registers
// ---------------------------------------------------------------------------

/// The MQTT front end plays the part of the host runtime: accessories are
/// registered here and driven by inbound MQTT commands. There is no on-disk
/// accessory cache, so nothing is ever restored.
#[derive(Default)]
struct MqttHost {
    accessories: Vec<Accessory>,
}

impl AccessoryHost for MqttHost {
    fn restored(&self) -> &[uuid::Uuid] {
        &[]
    }

    fn register(&mut self, accessory: Accessory) {
        self.accessories.push(accessory);
    }
}

impl MqttHost {
    /// Pick the accessory a command addresses: by display name when given,
    /// otherwise the sole configured accessory.
    fn select(&self, device: Option<&str>) -> Option<&Accessory> {
        match device {
            Some(name) => self.accessories.iter().find(|a| a.display_name == name),
            None if self.accessories.len() == 1 => self.accessories.first(),
            None => None,
        }
    }
}

/// Read an accessory's live state and publish it retained.
async fn publish_state(client: &AsyncClient, topic: &str, accessory: &Accessory) -> Option<u8> {
    match accessory.control.current_state().await {
        Ok(code) => {
            let msg = MqttStateEvent {
                now: now_epoch_ms(),
                op: "STATE".to_string(),
                device: accessory.display_name.clone(),
                value: code,
            };
            publish_json(client, topic, &msg, true).await;
            Some(code)
        }
        Err(e) if e.is_retryable() => {
            warn!("State poll for {} failed: {e}", accessory.display_name);
            None
        }
        Err(e) => {
            error!("State read for {} failed: {e}", accessory.display_name);
            None
        }
    }
}

// ---------------------------------------------------------------------------
// MQTT command handler
// ---------------------------------------------------------------------------

async fn handle_command(
    payload_str: &str,
    cmd: MqttCommand,
    client: &AsyncClient,
    topic: &str,
    host: &MqttHost,
) {
    // Parse the raw payload as a JSON value for the CMD_ACK src field
    let src_json = serde_json::from_str::<serde_json::Value>(payload_str).ok();

    if cmd.op == "PING" {
        info!("Command: PING");
        publish_cmd_ack(client, topic, true, src_json, None).await;
        return;
    }

    if !matches!(cmd.op.as_str(), "GET_STATE" | "SET_STATE") {
        warn!("Unknown command: {}", cmd.op);
        publish_cmd_ack(client, topic, false, src_json, None).await;
        return;
    }

    let accessory = match host.select(cmd.device.as_deref()) {
        Some(a) => a,
        None => {
            warn!(
                "{}: no accessory matches device {:?} ({} configured)",
                cmd.op,
                cmd.device,
                host.accessories.len()
            );
            publish_cmd_ack(client, topic, false, src_json, None).await;
            return;
        }
    };

    if cmd.op == "GET_STATE" {
        debug!("Command: GET_STATE {}", accessory.display_name);
        match publish_state(client, topic, accessory).await {
            Some(code) => {
                let data = serde_json::json!({ "value": code });
                publish_cmd_ack(client, topic, true, src_json, Some(data)).await;
            }
            None => publish_cmd_ack(client, topic, false, src_json, None).await,
        }
    } else {
        let value = match cmd.value {
            Some(v) => v,
            None => {
                warn!("SET_STATE: missing value");
                publish_cmd_ack(client, topic, false, src_json, None).await;
                return;
            }
        };
        info!("Command: SET_STATE {} -> {value}", accessory.display_name);
        match accessory.control.set_target_state(value).await {
            Ok(echoed) => {
                // The device is not re-read here; the poll ticker picks
                // up the actual state on its next pass.
                let data = serde_json::json!({ "value": echoed });
                publish_cmd_ack(client, topic, true, src_json, Some(data)).await;
            }
            Err(e) => {
                error!("SET_STATE {} failed: {e}", accessory.display_name);
                publish_cmd_ack(client, topic, false, src_json, None).await;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG controls verbosity (e.g. RUST_LOG=debug or RUST_LOG=adt_panel_bridge=trace).
    // Default: info.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // systemd journal already adds timestamps, so omit them when running under systemd
    if std::env::var_os("JOURNAL_STREAM").is_some() {
        tracing_subscriber::fmt().without_time().with_env_filter(env_filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let cli = Cli::parse();

    let mut config = load_config(&cli.config)?;
    let mut devices = build_device_contexts(&config.devices)?;

    let mut sighup = signal(SignalKind::hangup())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    loop {
        // "Finished launching": register accessories before any MQTT traffic
        let platform = Platform::new(devices.clone());
        let mut mqtt_host = MqttHost::default();
        let registered = platform.launch(&mut mqtt_host);
        info!("Registered {registered} accessories");
        let host = Arc::new(mqtt_host);

        let (mqtt_tx_host, mqtt_port) = parse_mqtt_url(&config.mqtt.url)?;
        let mut mqtt_opts = MqttOptions::new(&config.mqtt.client_id, &mqtt_tx_host, mqtt_port);
        mqtt_opts.set_keep_alive(Duration::from_secs(30));
        let (client, mut eventloop) = AsyncClient::new(mqtt_opts, 256);

        let subscribe_topic = config.mqtt.subscribe_topic.clone();
        let publish_topic = config.mqtt.publish_topic.clone();

        client
            .subscribe(&subscribe_topic, QoS::AtLeastOnce)
            .await
            .context("Failed to subscribe to MQTT topic")?;
        info!("MQTT: subscribed to {subscribe_topic}");

        // Publish initial state for every accessory
        for accessory in &host.accessories {
            publish_state(&client, &publish_topic, accessory).await;
        }

        // Task 1: MQTT event loop (receives messages, handles commands)
        let host_cmds = Arc::clone(&host);
        let client_cmds = client.clone();
        let topic_cmds = publish_topic.clone();
        let sub_topic = subscribe_topic.clone();
        let mqtt_handle = tokio::spawn(async move {
            loop {
                match eventloop.poll().await {
                    Ok(Event::Incoming(Packet::ConnAck(_))) => {
                        // (Re)subscribe after every broker connect/reconnect.
                        // rumqttc does not auto-resubscribe, so without this a
                        // broker restart silently drops our subscription and we
                        // stop receiving commands.
                        info!("MQTT: connected, subscribing to {sub_topic}");
                        if let Err(e) =
                            client_cmds.subscribe(&sub_topic, QoS::AtLeastOnce).await
                        {
                            error!("Failed to subscribe to {sub_topic}: {e}");
                        }
                    }
                    Ok(Event::Incoming(Packet::Publish(msg))) => {
                        if msg.topic == sub_topic {
                            let payload = String::from_utf8_lossy(&msg.payload);
                            match serde_json::from_str::<MqttCommand>(&payload) {
                                Ok(cmd) => {
                                    info!("MQTT command received: {payload}");
                                    handle_command(
                                        &payload,
                                        cmd,
                                        &client_cmds,
                                        &topic_cmds,
                                        &host_cmds,
                                    )
                                    .await;
                                }
                                Err(e) => {
                                    warn!("Failed to parse MQTT command: {e}");
                                }
                            }
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        error!("MQTT event loop error: {e}");
                        tokio::time::sleep(Duration::from_secs(1)).await;
                    }
                }
            }
        });

        // Task 2: poll ticker — refreshes the retained state topic
        let host_poll = Arc::clone(&host);
        let client_poll = client.clone();
        let topic_poll = publish_topic.clone();
        let poll_interval_secs = config.mqtt.poll_interval_secs;
        let poll_handle = tokio::spawn(async move {
            let mut ticker = interval(Duration::from_secs(poll_interval_secs));
            // Skip the first immediate tick (initial state already published)
            ticker.tick().await;
            loop {
                ticker.tick().await;
                for accessory in &host_poll.accessories {
                    publish_state(&client_poll, &topic_poll, accessory).await;
                }
            }
        });

        // Wait for a signal
        info!("MQTT bridge running. Send SIGHUP to restart, SIGINT/SIGTERM to stop.");
        let restart = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received SIGINT, shutting down...");
                false
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down...");
                false
            }
            _ = sighup.recv() => {
                info!("Received SIGHUP, reloading config and restarting...");
                true
            }
        };

        // Abort tasks
        mqtt_handle.abort();
        poll_handle.abort();

        if !restart {
            break;
        }

        // Reload config from disk; keep previous config on failure
        info!("Reloading config from {}", cli.config);
        match load_config(&cli.config).and_then(|new_config| {
            let new_devices = build_device_contexts(&new_config.devices)?;
            Ok((new_config, new_devices))
        }) {
            Ok((new_config, new_devices)) => {
                config = new_config;
                devices = new_devices;
                info!("Config reloaded successfully");
            }
            Err(e) => warn!("Failed to reload config, keeping previous: {e}"),
        }
    }

    info!("Shutdown complete");
    Ok(())
}

/// Parse an MQTT URL like "mqtt://host:port" into (host, port).
fn parse_mqtt_url(url: &str) -> Result<(String, u16)> {
    let stripped = url
        .strip_prefix("mqtt://")
        .or_else(|| url.strip_prefix("tcp://"))
        .unwrap_or(url);

    let (host, port_str) = stripped
        .rsplit_once(':')
        .context("MQTT URL must be in format mqtt://host:port")?;

    let port: u16 = port_str
        .parse()
        .context("Invalid MQTT port number")?;

    Ok((host.to_string(), port))
}
