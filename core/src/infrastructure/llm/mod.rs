pub mod deepseek_client;
