pub mod mqtt_client;
