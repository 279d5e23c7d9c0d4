pub mod in_memory;
pub mod mock_system;
