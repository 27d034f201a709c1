pub mod verify_wallet_dto;
