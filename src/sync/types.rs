use std::rc::Rc;

use parking_lot::{Mutex, MutexGuard as PLMutexGuard};

pub type RcMutex<T> = Rc<Mutex<T>>;

pub type MutexGuard<'a, T> = PLMutexGuard<'a, T>;

pub fn rc_mutex_new<T>(object: T) -> RcMutex<T> {
    Rc::new(Mutex::new(object))
}
