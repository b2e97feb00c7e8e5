//! # パスワードハッシュ
//!
//! 登録時のハッシュ化（[`PasswordHasher`]）とログイン時の照合（[`PasswordChecker`]）を
//! 別トレイトに分け、どちらも [`Argon2PasswordService`] が実装する。
//!
//! パラメータは Argon2id / m=64 MiB / t=1 / p=1。照合はハッシュ文字列側の
//! パラメータで行うため、値を変えても既存のハッシュはそのまま検証できる。

use apartments_domain::password::{PasswordHash, PasswordVerifyResult, PlainPassword};
use argon2::{
    Algorithm,
    Argon2,
    Params,
    PasswordHasher as _,
    PasswordVerifier as _,
    Version,
    password_hash::{self, SaltString, rand_core::OsRng},
};

use crate::InfraError;

const MEMORY_KIB: u32 = 64 * 1024;
const ITERATIONS: u32 = 1;
const PARALLELISM: u32 = 1;

pub trait PasswordChecker: Send + Sync {
    /// `hash` が PHC 文字列として解釈できない場合はエラー
    fn verify(
        &self,
        password: &PlainPassword,
        hash: &PasswordHash,
    ) -> Result<PasswordVerifyResult, InfraError>;
}

pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, InfraError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordService;

impl Argon2PasswordService {
    pub fn new() -> Self {
        Self
    }

    fn argon2() -> Result<Argon2<'static>, InfraError> {
        let params = Params::new(MEMORY_KIB, ITERATIONS, PARALLELISM, None)
            .map_err(|e| InfraError::unexpected(format!("Argon2 パラメータが不正です: {e}")))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl PasswordHasher for Argon2PasswordService {
    fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, InfraError> {
        let salt = SaltString::generate(&mut OsRng);
        let phc = Self::argon2()?
            .hash_password(password.as_str().as_bytes(), &salt)
            .map_err(|e| InfraError::unexpected(format!("パスワードのハッシュ化に失敗: {e}")))?;
        Ok(PasswordHash::new(phc.to_string()))
    }
}

impl PasswordChecker for Argon2PasswordService {
    fn verify(
        &self,
        password: &PlainPassword,
        hash: &PasswordHash,
    ) -> Result<PasswordVerifyResult, InfraError> {
        let stored = password_hash::PasswordHash::new(hash.as_str())
            .map_err(|e| InfraError::unexpected(format!("保存済みハッシュを解釈できません: {e}")))?;

        let matched = Self::argon2()?
            .verify_password(password.as_str().as_bytes(), &stored)
            .is_ok();
        Ok(matched.into())
    }
}
